//! Environment — a labeled collection of node ledgers.
//!
//! Nodes are independent: placing a task on one never touches another.
//! The environment only adds cross-node lookups, an earliest-start
//! placement helper and a shared clock tick.
//!
//! The task queue and backlog are held as plain containers sized from
//! config. No admission policy fills or drains them here.

use std::collections::HashSet;
use std::path::Path;

use tracing::{debug, info, trace};

use slotgrid_core::{EnvConfig, EnvSnapshot, NodeConfig, NodeSnapshot};
use slotgrid_ledger::{Placement, ResourceDimension, ResourceLedger, Task};

use crate::error::{EnvError, EnvResult, LedgerContext};

/// A single simulated node.
#[derive(Debug, Clone)]
pub struct Node {
    label: String,
    ledger: ResourceLedger,
}

impl Node {
    pub fn new(label: impl Into<String>, ledger: ResourceLedger) -> Self {
        Self {
            label: label.into(),
            ledger,
        }
    }

    fn from_config(index: usize, config: &NodeConfig) -> EnvResult<Self> {
        let label = config
            .label
            .clone()
            .unwrap_or_else(|| format!("node{}", index + 1));

        let dimensions = match &config.resource_names {
            Some(names) => names
                .iter()
                .zip(&config.resource_capacity)
                .map(|(name, &cap)| ResourceDimension::new(name.clone(), cap))
                .collect(),
            None => config
                .resource_capacity
                .iter()
                .enumerate()
                .map(|(i, &cap)| ResourceDimension::new(format!("resource{}", i + 1), cap))
                .collect(),
        };

        let ledger =
            ResourceLedger::with_dimensions(dimensions, config.duration_capacity).on_node(&label)?;
        Ok(Self { label, ledger })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }
}

/// Earliest feasible start for a task on one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeProbe {
    pub label: String,
    pub start: usize,
}

/// Where a task was committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePlacement {
    pub label: String,
    pub start: usize,
}

#[derive(Debug, Clone)]
pub struct Environment {
    nodes: Vec<Node>,
    queue_size: usize,
    backlog_size: usize,
    queue: Vec<Task>,
    backlog: Vec<Task>,
}

impl Environment {
    pub fn new(nodes: Vec<Node>, queue_size: usize, backlog_size: usize) -> EnvResult<Self> {
        let mut seen = HashSet::new();
        for node in &nodes {
            if !seen.insert(node.label.as_str()) {
                return Err(EnvError::DuplicateLabel(node.label.clone()));
            }
        }
        Ok(Self {
            nodes,
            queue_size,
            backlog_size,
            queue: Vec::with_capacity(queue_size),
            backlog: Vec::with_capacity(backlog_size),
        })
    }

    /// Build one ledger per configured node. Unlabeled nodes become
    /// `node1..nodeN` by position.
    pub fn from_config(config: &EnvConfig) -> EnvResult<Self> {
        config.validate()?;
        let nodes = config
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| Node::from_config(i, node))
            .collect::<EnvResult<Vec<_>>>()?;
        let env = Self::new(nodes, config.queue_size, config.backlog_size)?;
        info!(
            nodes = env.nodes.len(),
            queue_size = env.queue_size,
            backlog_size = env.backlog_size,
            "environment built"
        );
        Ok(env)
    }

    pub fn load(path: &Path) -> EnvResult<Self> {
        let config = EnvConfig::from_file(path)?;
        info!(path = %path.display(), "loaded environment config");
        Self::from_config(&config)
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node(&self, label: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    pub fn node_mut(&mut self, label: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.label == label)
    }

    pub fn queue(&self) -> &[Task] {
        &self.queue
    }

    pub fn backlog(&self) -> &[Task] {
        &self.backlog
    }

    pub fn queue_size(&self) -> usize {
        self.queue_size
    }

    pub fn backlog_size(&self) -> usize {
        self.backlog_size
    }

    /// Earliest start of `task` on every node that can take it, in node
    /// order. Nothing is mutated.
    pub fn probe(&self, task: &Task) -> EnvResult<Vec<NodeProbe>> {
        let mut probes = Vec::new();
        for node in &self.nodes {
            match node.ledger.find_start(task).on_node(&node.label)? {
                Some(placement) => probes.push(NodeProbe {
                    label: node.label.clone(),
                    start: placement.start(),
                }),
                None => trace!(node = %node.label, "task infeasible on node"),
            }
        }
        Ok(probes)
    }

    /// Commit `task` on the node offering the earliest start. Ties go to
    /// the node listed first. Returns `None` when no node can take it.
    pub fn place_earliest(&mut self, task: &Task) -> EnvResult<Option<NodePlacement>> {
        let mut best: Option<(usize, Placement)> = None;
        for (i, node) in self.nodes.iter().enumerate() {
            let Some(placement) = node.ledger.find_start(task).on_node(&node.label)? else {
                continue;
            };
            let better = match &best {
                Some((_, current)) => placement.start() < current.start(),
                None => true,
            };
            if better {
                best = Some((i, placement));
            }
        }

        let Some((i, placement)) = best else {
            return Ok(None);
        };

        let node = &mut self.nodes[i];
        let start = placement.start();
        node.ledger.commit(placement, task).on_node(&node.label)?;
        debug!(node = %node.label, start, "task placed on node");

        Ok(Some(NodePlacement {
            label: node.label.clone(),
            start,
        }))
    }

    /// Offer `task` to one specific node.
    pub fn schedule_on(&mut self, label: &str, task: &Task) -> EnvResult<Option<usize>> {
        let node = self
            .node_mut(label)
            .ok_or_else(|| EnvError::NodeNotFound(label.to_string()))?;
        let outcome = node.ledger.try_schedule(task).on_node(label)?;
        Ok(outcome.start())
    }

    /// Advance every node's horizon by one slot.
    pub fn advance_all(&mut self) {
        for node in &mut self.nodes {
            node.ledger.advance();
        }
        debug!(nodes = self.nodes.len(), "environment advanced");
    }

    pub fn snapshot(&self) -> EnvSnapshot {
        EnvSnapshot {
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeSnapshot {
                    label: n.label.clone(),
                    ledger: n.ledger.snapshot(),
                })
                .collect(),
            queue_size: self.queue_size,
            backlog_size: self.backlog_size,
            queued: self.queue.len(),
            backlogged: self.backlog.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EnvConfig {
        EnvConfig::from_json_str(
            r#"{
                "nodes": [
                    { "resource_capacity": [4], "duration_capacity": 5 },
                    { "resource_capacity": [8], "duration_capacity": 5 },
                    { "resource_capacity": [2], "duration_capacity": 3, "label": "tiny" }
                ],
                "queue_size": 10,
                "backlog_size": 60
            }"#,
        )
        .unwrap()
    }

    fn task(req: &[u32], duration: usize) -> Task {
        Task::new(req.to_vec(), duration).unwrap()
    }

    #[test]
    fn labels_default_by_position() {
        let env = Environment::from_config(&config()).unwrap();
        let labels: Vec<_> = env.nodes().iter().map(Node::label).collect();
        assert_eq!(labels, vec!["node1", "node2", "tiny"]);
        assert!(env.queue().is_empty());
        assert!(env.backlog().is_empty());
        assert_eq!(env.queue_size(), 10);
        assert_eq!(env.backlog_size(), 60);
    }

    #[test]
    fn duplicate_labels_rejected() {
        let mut cfg = config();
        cfg.nodes[2].label = Some("node1".to_string());
        let err = Environment::from_config(&cfg).unwrap_err();
        assert!(matches!(err, EnvError::DuplicateLabel(l) if l == "node1"));
    }

    #[test]
    fn new_from_prebuilt_nodes() {
        let a = Node::new("a", ResourceLedger::new(&[2], 2).unwrap());
        let b = Node::new("a", ResourceLedger::new(&[2], 2).unwrap());
        assert!(matches!(
            Environment::new(vec![a.clone(), b], 0, 0),
            Err(EnvError::DuplicateLabel(_))
        ));

        let env = Environment::new(vec![a], 1, 1).unwrap();
        assert_eq!(env.node("a").unwrap().ledger().horizon(), 2);
        assert!(env.node("b").is_none());
    }

    #[test]
    fn invalid_node_reports_position() {
        let mut cfg = config();
        cfg.nodes[1].duration_capacity = 0;
        let err = Environment::from_config(&cfg).unwrap_err();
        assert!(matches!(&err, EnvError::Config(_)));
        assert!(err.to_string().contains("node #2"));
    }

    #[test]
    fn empty_node_list_rejected() {
        let cfg = EnvConfig::from_json_str(r#"{ "nodes": [] }"#).unwrap();
        assert!(matches!(
            Environment::from_config(&cfg),
            Err(EnvError::Config(_))
        ));
    }

    #[test]
    fn resource_name_count_mismatch_rejected() {
        let mut cfg = config();
        cfg.nodes[0].resource_names = Some(vec!["cpu".to_string(), "mem".to_string()]);
        assert!(matches!(
            Environment::from_config(&cfg),
            Err(EnvError::Config(_))
        ));
    }

    #[test]
    fn named_dimensions() {
        let mut cfg = config();
        cfg.nodes[0].resource_names = Some(vec!["cpu".to_string()]);
        let env = Environment::from_config(&cfg).unwrap();
        let node = env.node("node1").unwrap();
        assert_eq!(node.ledger().dimensions()[0].name, "cpu");
    }

    #[test]
    fn probe_skips_infeasible_nodes() {
        let env = Environment::from_config(&config()).unwrap();
        let probes = env.probe(&task(&[3], 2)).unwrap();
        let labels: Vec<_> = probes.iter().map(|p| p.label.as_str()).collect();
        assert_eq!(labels, vec!["node1", "node2"]);
        assert!(probes.iter().all(|p| p.start == 0));
    }

    #[test]
    fn place_earliest_prefers_smallest_start() {
        let mut env = Environment::from_config(&config()).unwrap();
        // Fill slot 0 of node1 so node2 wins with start 0.
        env.schedule_on("node1", &task(&[4], 1)).unwrap();
        env.schedule_on("tiny", &task(&[2], 1)).unwrap();

        let placed = env.place_earliest(&task(&[2], 2)).unwrap().unwrap();
        assert_eq!(placed, NodePlacement { label: "node2".to_string(), start: 0 });

        // With every node blocked at slot 0, the tie at start 1 goes to node1.
        env.schedule_on("node2", &task(&[6], 1)).unwrap();
        let placed = env.place_earliest(&task(&[1], 1)).unwrap().unwrap();
        assert_eq!(placed, NodePlacement { label: "node1".to_string(), start: 1 });
    }

    #[test]
    fn place_earliest_none_when_nothing_fits() {
        let mut env = Environment::from_config(&config()).unwrap();
        let before = env.snapshot();
        assert!(env.place_earliest(&task(&[9], 1)).unwrap().is_none());
        assert_eq!(env.snapshot(), before);
    }

    #[test]
    fn dimension_mismatch_surfaces() {
        let mut env = Environment::from_config(&config()).unwrap();
        let err = env.place_earliest(&task(&[1, 1], 1)).unwrap_err();
        assert!(matches!(err, EnvError::Ledger { .. }));
    }

    #[test]
    fn schedule_on_unknown_node() {
        let mut env = Environment::from_config(&config()).unwrap();
        assert!(matches!(
            env.schedule_on("ghost", &task(&[1], 1)),
            Err(EnvError::NodeNotFound(_))
        ));
    }

    #[test]
    fn advance_all_ticks_every_node() {
        let mut env = Environment::from_config(&config()).unwrap();
        env.schedule_on("node1", &task(&[2], 2)).unwrap();
        env.advance_all();

        let snap = env.snapshot();
        assert!(snap.nodes.iter().all(|n| n.ledger.elapsed == 1));
        assert_eq!(snap.nodes[0].ledger.dimensions[0].free, vec![2, 4, 4, 4, 4]);
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("env.toml");
        std::fs::write(&path, config().to_toml_string().unwrap()).unwrap();

        let env = Environment::load(&path).unwrap();
        assert_eq!(env.nodes().len(), 3);
    }
}
