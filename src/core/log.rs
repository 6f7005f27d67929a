//! Append-only operation history
//!
//! Every requested operation — including rejected ones — is recorded with a
//! sequence number and a microsecond timestamp. The log is only ever
//! appended to and read; entries are immutable once written.

use crate::core::block::ProcessId;
use crate::core::error::MemoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Which neighbors coalesced during a deallocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeSummary {
    /// Neither neighbor was free
    None,
    /// Merged with the predecessor block
    Left,
    /// Merged with the successor block
    Right,
    /// Merged with both neighbors
    Both,
}

impl MergeSummary {
    pub fn from_neighbors(left: bool, right: bool) -> Self {
        match (left, right) {
            (false, false) => MergeSummary::None,
            (true, false) => MergeSummary::Left,
            (false, true) => MergeSummary::Right,
            (true, true) => MergeSummary::Both,
        }
    }
}

impl fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MergeSummary::None => "no merge",
            MergeSummary::Left => "merged left",
            MergeSummary::Right => "merged right",
            MergeSummary::Both => "merged both",
        };
        f.write_str(s)
    }
}

/// Requested operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Allocate { requested: u64 },
    Deallocate,
}

/// How the operation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Allocation succeeded at the given start address
    Allocated { address: u64 },
    /// Deallocation succeeded, freeing `size` units
    Freed { size: u64, merge: MergeSummary },
    /// The operation was rejected and nothing changed
    Rejected(MemoryError),
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Outcome::Rejected(_))
    }
}

/// Single log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Position in the history, starting at 0
    pub sequence: u64,
    /// Microsecond timestamp since the UNIX epoch
    pub timestamp_us: u64,
    /// Process the operation was requested for
    pub process_id: ProcessId,
    pub operation: Operation,
    pub outcome: Outcome,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.operation, &self.outcome) {
            (Operation::Allocate { requested }, Outcome::Allocated { address }) => write!(
                f,
                "#{}: allocated {} units to process {} at address {}",
                self.sequence, requested, self.process_id, address
            ),
            (Operation::Deallocate, Outcome::Freed { size, merge }) => write!(
                f,
                "#{}: freed {} units from process {} ({})",
                self.sequence, size, self.process_id, merge
            ),
            (Operation::Allocate { requested }, Outcome::Rejected(err)) => write!(
                f,
                "#{}: rejected allocation of {} units for process {}: {}",
                self.sequence, requested, self.process_id, err
            ),
            (Operation::Deallocate, Outcome::Rejected(err)) => write!(
                f,
                "#{}: rejected deallocation for process {}: {}",
                self.sequence, self.process_id, err
            ),
            // Success outcomes only ever pair with their own operation kind
            _ => write!(f, "#{}: {:?} -> {:?}", self.sequence, self.operation, self.outcome),
        }
    }
}

/// Append-only log owned by the manager
#[derive(Debug, Default)]
pub struct OperationLog {
    entries: Vec<LogEntry>,
}

impl OperationLog {
    pub fn new() -> Self {
        OperationLog {
            entries: Vec::new(),
        }
    }

    /// Record an operation, stamping it with the next sequence number and
    /// the current time
    pub fn record(&mut self, process_id: ProcessId, operation: Operation, outcome: Outcome) {
        let timestamp_us = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_micros() as u64)
            .unwrap_or(0);

        self.entries.push(LogEntry {
            sequence: self.entries.len() as u64,
            timestamp_us,
            process_id,
            operation,
            outcome,
        });
    }

    /// Full history in chronological order
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
