//! Storage listing contract
//!
//! Discovery only ever needs to enumerate object paths, so the storage layer
//! is consumed through a single operation:
//! - **Filesystem** (`FsObjectStore`): recursive walk of a root directory
//! - **Memory** (`MemoryObjectStore`): in-memory paths, for tests and embedding
//!
//! Remote object services plug in by implementing [`ObjectLister`].

mod fs;
mod memory;

pub use fs::FsObjectStore;
pub use memory::{MemoryObjectStore, OperationCounts};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An object as reported by a storage listing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoredObject {
    /// `/`-separated path relative to the store root
    pub path: String,
}

impl StoredObject {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// Listing side of a storage backend
///
/// Implementations must be Send + Sync for use across request handlers.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// Short backend name used in logs
    fn backend_name(&self) -> &'static str;

    /// List every object whose path starts with `prefix` (empty = whole store)
    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredObject>>;
}

/// Normalize a listing prefix: no leading separators
pub(crate) fn normalize_prefix(prefix: &str) -> &str {
    prefix.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_prefix() {
        assert_eq!(normalize_prefix(""), "");
        assert_eq!(normalize_prefix("/repoA"), "repoA");
        assert_eq!(normalize_prefix("//repoA/charts"), "repoA/charts");
    }
}
