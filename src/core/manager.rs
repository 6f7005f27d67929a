//! First Fit block-list manager
//!
//! Owns the ordered block list and the operation log. Allocation scans
//! blocks in ascending address order and takes the first free block large
//! enough, splitting off a free remainder when the fit is not exact.
//! Deallocation flips the owner's block back to free and coalesces it with
//! free neighbors, so no two adjacent free blocks ever survive an
//! operation.

use crate::core::block::{Block, BlockSnapshot, BlockState, ProcessId};
use crate::core::error::{MemoryError, Result};
use crate::core::log::{LogEntry, MergeSummary, Operation, OperationLog, Outcome};
use crate::core::report::{FragmentationReport, MemoryStatus};
use tracing::debug;

/// First Fit memory manager over a fixed address space
///
/// The block list always tiles `[0, total_size)` exactly: the first block
/// starts at 0, each block ends where the next begins, and the last block
/// ends at `total_size`. Validation runs strictly before mutation, so a
/// rejected operation leaves the partition untouched.
#[derive(Debug)]
pub struct FirstFitManager {
    total_size: u64,
    blocks: Vec<Block>,
    log: OperationLog,
}

impl FirstFitManager {
    /// Create a manager with the whole address space as one free block
    ///
    /// `total_size` is the fixed extent in units and must be positive.
    pub fn new(total_size: u64) -> Result<Self> {
        if total_size == 0 {
            return Err(MemoryError::InvalidSize(0));
        }

        Ok(FirstFitManager {
            total_size,
            blocks: vec![Block::free(0, total_size)],
            log: OperationLog::new(),
        })
    }

    /// Fixed extent of the address space
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Allocate `requested` units for `process_id` using First Fit
    ///
    /// Checks run in a fixed order: request size, then owner uniqueness,
    /// then the fit search. A process already holding a block is reported
    /// as [`MemoryError::DuplicateProcess`] even when the request could not
    /// have been satisfied anyway. Returns the start address of the
    /// allocated block.
    pub fn allocate(&mut self, process_id: ProcessId, requested: u64) -> Result<u64> {
        let operation = Operation::Allocate { requested };

        if requested == 0 {
            return Err(self.reject(process_id, operation, MemoryError::InvalidSize(requested)));
        }

        if self.owner_position(process_id).is_some() {
            return Err(self.reject(
                process_id,
                operation,
                MemoryError::DuplicateProcess(process_id),
            ));
        }

        // First Fit: lowest-addressed free block that can hold the request
        let index = match self
            .blocks
            .iter()
            .position(|b| b.is_free() && b.size >= requested)
        {
            Some(i) => i,
            None => {
                let err = MemoryError::OutOfMemory {
                    requested,
                    largest_free: self.largest_free_block(),
                };
                return Err(self.reject(process_id, operation, err));
            }
        };

        let found = self.blocks[index];
        let address = found.start;

        if found.size == requested {
            // Exact fit, flip in place
            self.blocks[index].state = BlockState::Allocated(process_id);
        } else {
            // Split: allocated head, free remainder immediately after
            self.blocks[index] = Block::allocated(address, requested, process_id);
            self.blocks.insert(
                index + 1,
                Block::free(address + requested, found.size - requested),
            );
        }

        debug!(process_id, requested, address, "allocated block");
        self.log
            .record(process_id, operation, Outcome::Allocated { address });
        Ok(address)
    }

    /// Release the block owned by `process_id` and coalesce free neighbors
    ///
    /// Merges the predecessor first, then the successor; on a linear tiling
    /// the resulting extent is the maximal contiguous free run either way.
    /// Returns which merges occurred.
    pub fn deallocate(&mut self, process_id: ProcessId) -> Result<MergeSummary> {
        let position = match self.owner_position(process_id) {
            Some(i) => i,
            None => {
                return Err(self.reject(
                    process_id,
                    Operation::Deallocate,
                    MemoryError::ProcessNotFound(process_id),
                ));
            }
        };

        let freed_size = self.blocks[position].size;
        self.blocks[position].state = BlockState::Free;

        let mut index = position;
        let merged_left = index > 0 && self.blocks[index - 1].is_free();
        if merged_left {
            let prev = self.blocks[index - 1];
            self.blocks[index].start = prev.start;
            self.blocks[index].size += prev.size;
            self.blocks.remove(index - 1);
            index -= 1;
        }

        let merged_right = index + 1 < self.blocks.len() && self.blocks[index + 1].is_free();
        if merged_right {
            let next_size = self.blocks[index + 1].size;
            self.blocks[index].size += next_size;
            self.blocks.remove(index + 1);
        }

        let merge = MergeSummary::from_neighbors(merged_left, merged_right);
        debug!(process_id, freed_size, %merge, "deallocated block");
        self.log.record(
            process_id,
            Operation::Deallocate,
            Outcome::Freed {
                size: freed_size,
                merge,
            },
        );
        Ok(merge)
    }

    /// Current usage summary
    pub fn status(&self) -> MemoryStatus {
        let allocated_total: u64 = self
            .blocks
            .iter()
            .filter(|b| !b.is_free())
            .map(|b| b.size)
            .sum();
        let free_block_count = self.blocks.iter().filter(|b| b.is_free()).count();

        MemoryStatus {
            total_size: self.total_size,
            allocated_total,
            free_total: self.total_size - allocated_total,
            utilization: allocated_total as f64 / self.total_size as f64,
            block_count: self.blocks.len(),
            allocated_block_count: self.blocks.len() - free_block_count,
            free_block_count,
        }
    }

    /// Blocks in ascending start order
    pub fn memory_map(&self) -> Vec<BlockSnapshot> {
        self.blocks.iter().map(BlockSnapshot::from).collect()
    }

    /// Fragmentation analysis of the current partition
    pub fn fragmentation(&self) -> FragmentationReport {
        let status = self.status();

        FragmentationReport {
            external_fragmentation: status.free_block_count.saturating_sub(1),
            internal_fragmentation: 0,
            largest_free_block: self.largest_free_block(),
            free_total: status.free_total,
            allocated_total: status.allocated_total,
            utilization: status.utilization,
        }
    }

    /// Full operation history, oldest first
    pub fn log(&self) -> &[LogEntry] {
        self.log.entries()
    }

    /// Index of the block owned by `process_id`, if one exists
    ///
    /// At most one block can match, by the ownership invariant.
    fn owner_position(&self, process_id: ProcessId) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.owner() == Some(process_id))
    }

    fn largest_free_block(&self) -> u64 {
        self.blocks
            .iter()
            .filter(|b| b.is_free())
            .map(|b| b.size)
            .max()
            .unwrap_or(0)
    }

    /// Record a rejection in the log and hand the error back
    fn reject(
        &mut self,
        process_id: ProcessId,
        operation: Operation,
        err: MemoryError,
    ) -> MemoryError {
        debug!(process_id, %err, "rejected operation");
        self.log
            .record(process_id, operation, Outcome::Rejected(err));
        err
    }
}
