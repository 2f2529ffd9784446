//! Serializable snapshots shared across SlotGrid crates.

use serde::{Deserialize, Serialize};

/// Free-count profile of one resource dimension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionSnapshot {
    pub name: String,
    pub capacity: u32,
    /// Remaining capacity per slot, slot 0 first.
    pub free: Vec<u32>,
}

impl DimensionSnapshot {
    /// Fraction of the dimension's slot-capacity currently occupied.
    pub fn utilization(&self) -> f64 {
        let total = u64::from(self.capacity) * self.free.len() as u64;
        if total == 0 {
            return 0.0;
        }
        let free: u64 = self.free.iter().map(|&f| u64::from(f)).sum();
        (total - free) as f64 / total as f64
    }
}

/// Point-in-time copy of a single node's ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub horizon: usize,
    /// Slots elapsed since the ledger was created.
    pub elapsed: u64,
    pub dimensions: Vec<DimensionSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub label: String,
    pub ledger: LedgerSnapshot,
}

/// Point-in-time copy of a whole environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvSnapshot {
    pub nodes: Vec<NodeSnapshot>,
    pub queue_size: usize,
    pub backlog_size: usize,
    pub queued: usize,
    pub backlogged: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utilization_counts_occupied_share() {
        let dim = DimensionSnapshot {
            name: "resource1".to_string(),
            capacity: 4,
            free: vec![2, 4, 0, 4],
        };
        assert!((dim.utilization() - 0.375).abs() < f64::EPSILON);
    }
}
