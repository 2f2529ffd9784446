//! Environment error types.

use thiserror::Error;

/// Errors that can occur while building or driving an environment.
#[derive(Debug, Error)]
pub enum EnvError {
    #[error("duplicate node label: {0}")]
    DuplicateLabel(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("ledger error on {node}: {source}")]
    Ledger {
        node: String,
        #[source]
        source: slotgrid_ledger::LedgerError,
    },

    #[error("config error: {0}")]
    Config(#[from] anyhow::Error),
}

pub type EnvResult<T> = Result<T, EnvError>;

pub(crate) trait LedgerContext<T> {
    fn on_node(self, node: &str) -> EnvResult<T>;
}

impl<T> LedgerContext<T> for slotgrid_ledger::LedgerResult<T> {
    fn on_node(self, node: &str) -> EnvResult<T> {
        self.map_err(|source| EnvError::Ledger {
            node: node.to_string(),
            source,
        })
    }
}
