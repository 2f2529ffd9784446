//! slotgrid-env — a named collection of simulated nodes.
//!
//! Builds one [`ResourceLedger`](slotgrid_ledger::ResourceLedger) per node
//! from an [`EnvConfig`](slotgrid_core::EnvConfig) and offers cross-node
//! operations on top:
//!
//! - **`probe`** — earliest start per node, read-only
//! - **`place_earliest`** — commit on the node with the earliest start
//! - **`advance_all`** — tick every node's clock together
//!
//! Queue and backlog containers are carried for callers that implement
//! their own admission control.

pub mod environment;
pub mod error;

pub use environment::{Environment, Node, NodePlacement, NodeProbe};
pub use error::{EnvError, EnvResult};
