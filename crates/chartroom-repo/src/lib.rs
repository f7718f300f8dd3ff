//! Chartroom Repository Discovery
//!
//! A multi-tenant chart server keeps no registry of its repositories; they
//! are inferred from how charts are laid out in storage. This crate provides:
//!
//! - **Access gate**: feature toggle checked before any scan
//! - **Local-tree discovery**: cheap scan of `<root>/<repo>/charts/*.tgz`
//!   and `<root>/<repo>/*.tgz` on a local filesystem
//! - **Object discovery**: derives names from any backend's object listing
//! - **Orchestration**: strategies tried in order until one applies
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chartroom_core::{FsObjectStore, ServerConfig};
//! use chartroom_repo::RepositoryDiscovery;
//!
//! # async fn example(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
//! let root = config.storage.local_root_dir.clone().unwrap_or_default();
//! let discovery = RepositoryDiscovery::from_config(&config, Arc::new(FsObjectStore::new(root)));
//!
//! let names = discovery.discover().await?;
//! println!("{}", names.join("\n"));
//! # Ok(())
//! # }
//! ```

pub mod discovery;
pub mod error;
pub mod gate;
pub mod local;
pub mod objects;

// Re-exports for convenience
pub use discovery::{Attempt, Discoverer, InapplicableReason, RepositoryDiscovery};
pub use error::{DiscoveryError, Result};
pub use gate::AccessGate;
pub use local::LocalTreeDiscoverer;
pub use objects::{ObjectDiscoverer, infer_repository};
