//! Per-node resource ledger.
//!
//! Tracks, for every resource dimension, the free capacity of each slot in
//! a fixed-length horizon. Scheduling is two-phase:
//!
//! 1. [`ResourceLedger::find_start`] scans for the earliest window where
//!    every dimension has enough room in every slot, and returns a
//!    [`Placement`] stamped with the ledger's current generation.
//! 2. [`ResourceLedger::commit`] applies a placement. Any mutation between
//!    the two phases bumps the generation and invalidates the placement.
//!
//! [`ResourceLedger::try_schedule`] runs both phases back to back.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use slotgrid_core::{DimensionSnapshot, LedgerSnapshot};

use crate::error::{LedgerError, LedgerResult};
use crate::grid::OccupancyGrid;
use crate::task::Task;

/// A named resource axis with a fixed per-slot capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDimension {
    pub name: String,
    pub capacity: u32,
}

impl ResourceDimension {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// A feasible window found by [`ResourceLedger::find_start`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    start: usize,
    duration: usize,
    requirements: Vec<u32>,
    generation: u64,
}

impl Placement {
    pub fn start(&self) -> usize {
        self.start
    }

    /// Slot range `[start, start + duration)` covered by this placement.
    pub fn slots(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.duration
    }
}

/// Result of offering a task to a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleOutcome {
    /// Task occupies `[start, start + duration)`.
    Placed { start: usize },
    /// No feasible window in the current horizon. The ledger is unchanged.
    Infeasible,
}

impl ScheduleOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, ScheduleOutcome::Placed { .. })
    }

    pub fn start(&self) -> Option<usize> {
        match self {
            ScheduleOutcome::Placed { start } => Some(*start),
            ScheduleOutcome::Infeasible => None,
        }
    }
}

/// Time-windowed, multi-dimensional occupancy for a single node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLedger {
    dimensions: Vec<ResourceDimension>,
    horizon: usize,
    /// `free[d][t]` = remaining capacity of dimension `d` in slot `t`.
    free: Vec<VecDeque<u32>>,
    /// Bumped on every commit and advance.
    generation: u64,
    /// Slots discarded by `advance` since construction.
    elapsed: u64,
}

impl ResourceLedger {
    /// Build a ledger with dimensions named `resource1..resourceD`.
    pub fn new(capacities: &[u32], horizon: usize) -> LedgerResult<Self> {
        let dimensions = capacities
            .iter()
            .enumerate()
            .map(|(i, &cap)| ResourceDimension::new(format!("resource{}", i + 1), cap))
            .collect();
        Self::with_dimensions(dimensions, horizon)
    }

    pub fn with_dimensions(
        dimensions: Vec<ResourceDimension>,
        horizon: usize,
    ) -> LedgerResult<Self> {
        if dimensions.is_empty() {
            return Err(LedgerError::InvalidConfig(
                "at least one resource dimension is required".to_string(),
            ));
        }
        if let Some(dim) = dimensions.iter().find(|d| d.capacity == 0) {
            return Err(LedgerError::InvalidConfig(format!(
                "capacity of {} must be positive",
                dim.name
            )));
        }
        if horizon == 0 {
            return Err(LedgerError::InvalidConfig(
                "horizon must be positive".to_string(),
            ));
        }

        let free = dimensions
            .iter()
            .map(|d| std::iter::repeat_n(d.capacity, horizon).collect())
            .collect();

        Ok(Self {
            dimensions,
            horizon,
            free,
            generation: 0,
            elapsed: 0,
        })
    }

    pub fn dimensions(&self) -> &[ResourceDimension] {
        &self.dimensions
    }

    pub fn dimension_count(&self) -> usize {
        self.dimensions.len()
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    /// Number of slots that have elapsed through [`advance`](Self::advance).
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    /// Earliest feasible window for `task`, or `None` if the current horizon
    /// has no room for it.
    pub fn find_start(&self, task: &Task) -> LedgerResult<Option<Placement>> {
        self.check_dimension(task)?;

        let req = task.requirements();
        let duration = task.duration();

        let mut t = 0;
        let mut run = 0;
        while t < self.horizon && run < duration {
            let qualifies = self
                .free
                .iter()
                .zip(req)
                .all(|(free, &need)| free[t] >= need);
            if qualifies {
                run += 1;
            } else {
                run = 0;
            }
            t += 1;
        }

        if run < duration {
            trace!(
                duration,
                horizon = self.horizon,
                "no feasible window"
            );
            return Ok(None);
        }

        Ok(Some(Placement {
            start: t - duration,
            duration,
            requirements: req.to_vec(),
            generation: self.generation,
        }))
    }

    /// Apply a placement returned by [`find_start`](Self::find_start) for the
    /// same task.
    pub fn commit(&mut self, placement: Placement, task: &Task) -> LedgerResult<()> {
        self.check_dimension(task)?;
        if placement.generation != self.generation {
            return Err(LedgerError::StalePlacement {
                issued: placement.generation,
                current: self.generation,
            });
        }
        if placement.duration != task.duration()
            || placement.requirements.as_slice() != task.requirements()
        {
            return Err(LedgerError::PlacementMismatch(format!(
                "placement was computed for {:?} x {} slots",
                placement.requirements, placement.duration
            )));
        }

        // Generations are per ledger, so a placement from another ledger can
        // carry a matching stamp. Re-check the window against this state.
        if placement.start + placement.duration > self.horizon {
            return Err(LedgerError::PlacementMismatch(format!(
                "window {:?} exceeds horizon {}",
                placement.slots(),
                self.horizon
            )));
        }
        if !self.window_fits(&placement) {
            return Err(LedgerError::PlacementMismatch(format!(
                "window {:?} lacks free capacity on this ledger",
                placement.slots()
            )));
        }

        self.occupy(&placement);
        Ok(())
    }

    /// Search for the earliest window and occupy it. All dimensions are
    /// admitted together or not at all.
    pub fn try_schedule(&mut self, task: &Task) -> LedgerResult<ScheduleOutcome> {
        match self.find_start(task)? {
            Some(placement) => {
                let start = placement.start;
                self.occupy(&placement);
                Ok(ScheduleOutcome::Placed { start })
            }
            None => Ok(ScheduleOutcome::Infeasible),
        }
    }

    /// Slide the horizon forward by one slot. Slot 0 is discarded and a
    /// fully free slot is appended at the end.
    pub fn advance(&mut self) {
        for (free, dim) in self.free.iter_mut().zip(&self.dimensions) {
            free.pop_front();
            free.push_back(dim.capacity);
        }
        self.generation += 1;
        self.elapsed += 1;
        debug!(elapsed = self.elapsed, "horizon advanced");
    }

    /// Free-count profile of dimension `d` across the horizon.
    pub fn free(&self, d: usize) -> LedgerResult<Vec<u32>> {
        self.free
            .get(d)
            .map(|free| free.iter().copied().collect())
            .ok_or(LedgerError::UnknownDimension(d))
    }

    pub fn free_at(&self, d: usize, t: usize) -> Option<u32> {
        self.free.get(d)?.get(t).copied()
    }

    /// Occupancy grid of dimension `d`, regenerated from free counts.
    pub fn grid(&self, d: usize) -> LedgerResult<OccupancyGrid<'_>> {
        let dim = self
            .dimensions
            .get(d)
            .ok_or(LedgerError::UnknownDimension(d))?;
        Ok(OccupancyGrid::new(dim.capacity, &self.free[d]))
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            horizon: self.horizon,
            elapsed: self.elapsed,
            dimensions: self
                .dimensions
                .iter()
                .zip(&self.free)
                .map(|(dim, free)| DimensionSnapshot {
                    name: dim.name.clone(),
                    capacity: dim.capacity,
                    free: free.iter().copied().collect(),
                })
                .collect(),
        }
    }

    fn check_dimension(&self, task: &Task) -> LedgerResult<()> {
        if task.dimension() != self.dimensions.len() {
            return Err(LedgerError::DimensionMismatch {
                expected: self.dimensions.len(),
                actual: task.dimension(),
            });
        }
        Ok(())
    }

    fn window_fits(&self, placement: &Placement) -> bool {
        placement.slots().all(|t| {
            self.free
                .iter()
                .zip(&placement.requirements)
                .all(|(free, &need)| free[t] >= need)
        })
    }

    /// Caller guarantees the placement was validated against the current
    /// state.
    fn occupy(&mut self, placement: &Placement) {
        for t in placement.slots() {
            for (free, &need) in self.free.iter_mut().zip(&placement.requirements) {
                free[t] -= need;
            }
        }
        self.generation += 1;
        debug!(
            start = placement.start,
            duration = placement.duration,
            requirements = ?placement.requirements,
            "task placed"
        );
    }
}
