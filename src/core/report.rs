//! Read-only aggregates over the block list

use serde::{Deserialize, Serialize};

/// Point-in-time memory usage summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryStatus {
    /// Fixed address-space extent in units
    pub total_size: u64,
    /// Sum of allocated block sizes
    pub allocated_total: u64,
    /// `total_size - allocated_total`
    pub free_total: u64,
    /// Allocated fraction of the address space, in `[0, 1]`
    pub utilization: f64,
    pub block_count: usize,
    pub allocated_block_count: usize,
    pub free_block_count: usize,
}

/// Fragmentation analysis
///
/// `external_fragmentation` counts free blocks beyond the single ideal
/// contiguous free region. `internal_fragmentation` is always zero in this
/// variable-partition scheme, where allocations match request sizes
/// exactly; the field exists for contrast with fixed-partition schemes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragmentationReport {
    pub external_fragmentation: usize,
    pub internal_fragmentation: u64,
    /// Size of the largest free block; explains why a request no larger
    /// than `free_total` can still fail
    pub largest_free_block: u64,
    pub free_total: u64,
    pub allocated_total: u64,
    pub utilization: f64,
}
