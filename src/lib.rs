//! # First Fit Memory Allocation Simulator
//!
//! `firstfit-rs` models an operating-system memory allocator over a single
//! fixed-size address space:
//!
//! - **First Fit allocation**: the lowest-addressed free block that can
//!   hold a request wins, splitting off a free remainder when the fit is
//!   not exact
//! - **Coalescing deallocation**: freed blocks merge with free neighbors,
//!   so free space is always maximally contiguous around a release
//! - **Fragmentation reporting**: external fragmentation, largest free
//!   block, and utilization, for explaining why a request can fail despite
//!   enough aggregate free space
//! - **Operation log**: an append-only history of every request, including
//!   rejected ones
//!
//! ## Quick Start
//!
//! ```rust
//! use firstfit_rs::{FirstFitManager, Result};
//!
//! # fn main() -> Result<()> {
//! // 1000 units of memory, one free block
//! let mut memory = FirstFitManager::new(1000)?;
//!
//! // Allocate for two processes
//! let a = memory.allocate(1, 200)?;
//! let b = memory.allocate(2, 300)?;
//! assert_eq!((a, b), (0, 200));
//!
//! // Release the first; its block stays a separate free gap
//! memory.deallocate(1)?;
//! assert_eq!(memory.fragmentation().external_fragmentation, 1);
//!
//! // Release the second; everything coalesces back into one block
//! memory.deallocate(2)?;
//! assert_eq!(memory.memory_map().len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! The simulator is single-threaded by design: the manager exclusively
//! owns the block list and the log, and callers mutate them only through
//! [`FirstFitManager::allocate`] and [`FirstFitManager::deallocate`].

pub mod core;

pub use crate::core::{
    block::{Block, BlockSnapshot, BlockState, ProcessId},
    error::{MemoryError, Result},
    log::{LogEntry, MergeSummary, Operation, Outcome},
    manager::FirstFitManager,
    report::{FragmentationReport, MemoryStatus},
};
