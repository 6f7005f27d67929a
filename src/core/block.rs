//! Memory blocks and their allocation state
//!
//! A [`Block`] is one contiguous region of the simulated address space.
//! The block list managed by [`FirstFitManager`](crate::core::manager::FirstFitManager)
//! keeps blocks sorted by start address so that they exactly tile
//! `[0, total_size)` with no gaps or overlaps.

use serde::{Deserialize, Serialize};

/// Identifier of a simulated process requesting memory
pub type ProcessId = u32;

/// Allocation state of a block
///
/// `Free` carries no owner and `Allocated` carries exactly one, so a block
/// can never be simultaneously free and owned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    /// Available for allocation
    Free,
    /// Held by the given process
    Allocated(ProcessId),
}

impl BlockState {
    /// Owner of the block, if any
    pub fn owner(&self) -> Option<ProcessId> {
        match self {
            BlockState::Free => None,
            BlockState::Allocated(pid) => Some(*pid),
        }
    }

    pub fn is_free(&self) -> bool {
        matches!(self, BlockState::Free)
    }
}

/// A contiguous region of the address space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Starting address (unit offset)
    pub start: u64,
    /// Extent in units, always positive
    pub size: u64,
    /// Free or allocated-with-owner
    pub state: BlockState,
}

impl Block {
    pub fn free(start: u64, size: u64) -> Self {
        Block {
            start,
            size,
            state: BlockState::Free,
        }
    }

    pub fn allocated(start: u64, size: u64, owner: ProcessId) -> Self {
        Block {
            start,
            size,
            state: BlockState::Allocated(owner),
        }
    }

    /// One past the last unit covered by this block
    pub fn end(&self) -> u64 {
        self.start + self.size
    }

    /// Check if this block covers the given address
    pub fn contains(&self, address: u64) -> bool {
        address >= self.start && address < self.end()
    }

    /// Check if `other` starts exactly where this block ends
    pub fn precedes(&self, other: &Block) -> bool {
        self.end() == other.start
    }

    pub fn is_free(&self) -> bool {
        self.state.is_free()
    }

    pub fn owner(&self) -> Option<ProcessId> {
        self.state.owner()
    }
}

/// Read-only view of a block as returned by
/// [`memory_map`](crate::core::manager::FirstFitManager::memory_map)
///
/// `end` is the last unit covered by the block (inclusive), matching the
/// address ranges shown in a conventional memory-map table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub start: u64,
    pub end: u64,
    pub size: u64,
    pub state: BlockState,
    pub owner: Option<ProcessId>,
}

impl From<&Block> for BlockSnapshot {
    fn from(block: &Block) -> Self {
        BlockSnapshot {
            start: block.start,
            end: block.end() - 1,
            size: block.size,
            state: block.state,
            owner: block.owner(),
        }
    }
}
