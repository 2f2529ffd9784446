//! Environment topology configuration.
//!
//! Accepts the JSON layout
//!
//! ```json
//! {
//!   "nodes": [{ "resource_capacity": [10, 10], "duration_capacity": 20 }],
//!   "queue_size": 10,
//!   "backlog_size": 60
//! }
//! ```
//!
//! or the same fields in TOML (`[[nodes]]` tables). Nodes may also carry an
//! explicit `label` and per-dimension `resource_names`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use anyhow::{Context, bail};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvConfig {
    pub nodes: Vec<NodeConfig>,
    #[serde(default)]
    pub queue_size: usize,
    #[serde(default)]
    pub backlog_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Per-slot capacity of each resource dimension.
    pub resource_capacity: Vec<u32>,
    /// Horizon length in slots.
    pub duration_capacity: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_names: Option<Vec<String>>,
}

impl EnvConfig {
    /// Load from a file. `.json` files are parsed as JSON, anything else as
    /// TOML. The result is validated.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_str(&content)?
        } else {
            Self::from_toml_str(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(s: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.nodes.is_empty() {
            bail!("config declares no nodes");
        }
        for (i, node) in self.nodes.iter().enumerate() {
            let name = node.label.clone().unwrap_or_else(|| format!("node #{}", i + 1));
            if node.resource_capacity.is_empty() {
                bail!("{name}: resource_capacity is empty");
            }
            if let Some(d) = node.resource_capacity.iter().position(|&c| c == 0) {
                bail!("{name}: capacity of dimension {} must be positive", d + 1);
            }
            if node.duration_capacity == 0 {
                bail!("{name}: duration_capacity must be positive");
            }
            let dims = node.resource_capacity.len();
            match &node.resource_names {
                Some(names) if names.len() != dims => {
                    bail!("{name}: {} resource names for {dims} dimensions", names.len());
                }
                _ => {}
            }
        }
        Ok(())
    }
}
