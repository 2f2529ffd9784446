pub mod config;
pub mod types;

pub use config::{EnvConfig, NodeConfig};
pub use types::*;
