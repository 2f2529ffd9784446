//! Task requests offered to a ledger.

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};

/// An immutable resource request: one amount per dimension, held for
/// `duration` contiguous slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTask")]
pub struct Task {
    requirements: Vec<u32>,
    duration: usize,
}

#[derive(Deserialize)]
struct RawTask {
    requirements: Vec<u32>,
    duration: usize,
}

impl TryFrom<RawTask> for Task {
    type Error = LedgerError;

    fn try_from(raw: RawTask) -> LedgerResult<Self> {
        Task::new(raw.requirements, raw.duration)
    }
}

impl Task {
    /// Build a task. A zero duration is rejected.
    pub fn new(requirements: Vec<u32>, duration: usize) -> LedgerResult<Self> {
        if duration == 0 {
            return Err(LedgerError::InvalidTask(
                "duration must be at least one slot".to_string(),
            ));
        }
        Ok(Self {
            requirements,
            duration,
        })
    }

    pub fn requirements(&self) -> &[u32] {
        &self.requirements
    }

    pub fn duration(&self) -> usize {
        self.duration
    }

    /// Number of dimensions this task asks for.
    pub fn dimension(&self) -> usize {
        self.requirements.len()
    }
}
