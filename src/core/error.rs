use crate::core::block::ProcessId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryError {
    #[error("Invalid allocation size: {0} (size must be positive)")]
    InvalidSize(u64),

    #[error("Process {0} already owns an allocated block")]
    DuplicateProcess(ProcessId),

    #[error("Out of memory: no free block can hold {requested} units (largest free block: {largest_free})")]
    OutOfMemory { requested: u64, largest_free: u64 },

    #[error("Process {0} has no allocated block")]
    ProcessNotFound(ProcessId),
}

pub type Result<T> = std::result::Result<T, MemoryError>;
