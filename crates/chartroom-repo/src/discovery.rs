//! Discovery strategies and their orchestration

use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use chartroom_core::{ObjectLister, ServerConfig};

use crate::error::{DiscoveryError, Result};
use crate::gate::AccessGate;
use crate::local::LocalTreeDiscoverer;
use crate::objects::ObjectDiscoverer;

/// Outcome of one discovery strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attempt {
    /// The strategy applies; names are sorted and unique (possibly empty)
    Found(Vec<String>),

    /// The strategy cannot answer; try the next one
    Inapplicable(InapplicableReason),
}

/// Why a strategy passed, for diagnostics only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InapplicableReason {
    RootNotConfigured,
    RootMissing,
    RootNotDirectory,
    ReadFailed,
    NoRepositories,
}

impl InapplicableReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RootNotConfigured => "root-not-configured",
            Self::RootMissing => "root-missing",
            Self::RootNotDirectory => "root-not-directory",
            Self::ReadFailed => "read-failed",
            Self::NoRepositories => "no-repositories",
        }
    }
}

impl fmt::Display for InapplicableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A strategy that infers repository names from one storage representation
#[async_trait]
pub trait Discoverer: Send + Sync {
    /// Strategy name used in logs
    fn name(&self) -> &'static str;

    /// Run the strategy once
    async fn attempt(&self) -> Result<Attempt>;
}

/// Gate plus an ordered chain of strategies
///
/// The first strategy that applies answers the request; an error from any
/// strategy ends the request. Each strategy runs at most once per call.
pub struct RepositoryDiscovery {
    gate: AccessGate,
    strategies: Vec<Box<dyn Discoverer>>,
}

impl RepositoryDiscovery {
    /// Create an orchestrator with no strategies
    pub fn new(gate: AccessGate) -> Self {
        Self {
            gate,
            strategies: Vec::new(),
        }
    }

    /// Append a strategy to the end of the chain
    pub fn with_strategy(mut self, strategy: impl Discoverer + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    /// Standard chain: local tree first, then a full object listing
    pub fn from_config(config: &ServerConfig, lister: Arc<dyn ObjectLister>) -> Self {
        let local_root = config.storage.tree_scan_root().map(Path::to_path_buf);

        Self::new(AccessGate::for_listing(&config.features))
            .with_strategy(LocalTreeDiscoverer::new(local_root))
            .with_strategy(
                ObjectDiscoverer::new(lister)
                    .with_max_objects(config.features.repo_list_max_objects),
            )
    }

    /// Names of the configured strategies, in evaluation order
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Discover repositories: sorted, unique names
    pub async fn discover(&self) -> Result<Vec<String>> {
        if !self.gate.allows() {
            tracing::debug!("repository listing denied by feature flag");
            return Err(DiscoveryError::Disabled);
        }

        for strategy in &self.strategies {
            match strategy.attempt().await {
                Ok(Attempt::Found(names)) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        count = names.len(),
                        "repositories discovered"
                    );
                    return Ok(names);
                }
                Ok(Attempt::Inapplicable(reason)) => {
                    tracing::debug!(
                        strategy = strategy.name(),
                        %reason,
                        "strategy inapplicable, falling through"
                    );
                }
                Err(e) => {
                    tracing::warn!(strategy = strategy.name(), "repository discovery failed: {}", e);
                    return Err(e);
                }
            }
        }

        Ok(Vec::new())
    }
}
