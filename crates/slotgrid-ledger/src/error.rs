//! Ledger error types.

use thiserror::Error;

/// Result type alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors that can occur while building or mutating a ledger.
///
/// An infeasible task is not an error: `try_schedule` reports it as
/// `ScheduleOutcome::Infeasible`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("invalid ledger config: {0}")]
    InvalidConfig(String),

    #[error("invalid task: {0}")]
    InvalidTask(String),

    #[error("dimension mismatch: ledger has {expected} dimensions, task has {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("dimension {0} out of range")]
    UnknownDimension(usize),

    #[error("stale placement: issued at generation {issued}, ledger is at {current}")]
    StalePlacement { issued: u64, current: u64 },

    #[error("placement does not match task: {0}")]
    PlacementMismatch(String),
}
