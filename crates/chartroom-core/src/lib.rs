//! Chartroom Core - Shared types for the multi-tenant chart server
//!
//! This crate provides the foundational pieces used by discovery and the server:
//! - `ObjectLister`: The minimal storage listing contract
//! - `FsObjectStore` / `MemoryObjectStore`: Listing backends
//! - `ServerConfig`: Startup configuration, resolved once and then immutable

pub mod config;
pub mod error;
pub mod storage;

pub use config::{FeatureFlags, ListenConfig, ServerConfig, StorageBackend, StorageConfig};
pub use error::{CoreError, Result};
pub use storage::{FsObjectStore, MemoryObjectStore, ObjectLister, OperationCounts, StoredObject};
