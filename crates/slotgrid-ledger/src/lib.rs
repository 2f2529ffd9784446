//! slotgrid-ledger — time-windowed resource occupancy for a single node.
//!
//! A [`ResourceLedger`] tracks the free capacity of every resource
//! dimension over a sliding horizon of discrete slots. Callers offer
//! [`Task`]s and periodically [`advance`](ResourceLedger::advance) the clock.
//!
//! # Components
//!
//! - **`ledger`** — placement search, occupancy, horizon advance
//! - **`task`** — immutable resource requests
//! - **`grid`** — read-only cell view for inspection and export
//! - **`error`** — ledger error taxonomy
//!
//! The ledger performs no I/O and is not internally synchronized. Wrap it
//! in a mutex if several threads must schedule against the same node;
//! distinct ledgers are independent.

pub mod error;
pub mod grid;
pub mod ledger;
pub mod task;

pub use error::{LedgerError, LedgerResult};
pub use grid::{Cell, OccupancyGrid};
pub use ledger::{Placement, ResourceDimension, ResourceLedger, ScheduleOutcome};
pub use task::Task;
