//! In-memory object store
//!
//! Holds a fixed set of paths and counts listing calls, which lets tests
//! assert that storage was (or was not) touched. A failure message can be
//! armed to make every listing fail.

use async_trait::async_trait;
use std::sync::{Arc, PoisonError, RwLock};

use super::{ObjectLister, StoredObject, normalize_prefix};
use crate::error::{CoreError, Result};

/// In-memory object store
#[derive(Clone, Default)]
pub struct MemoryObjectStore {
    objects: Arc<RwLock<Vec<StoredObject>>>,
    failure: Arc<RwLock<Option<String>>>,
    operations: Arc<RwLock<OperationCounts>>,
}

/// Counts of operations performed for testing assertions
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OperationCounts {
    pub lists: usize,
}

impl MemoryObjectStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with pre-populated object paths
    pub fn with_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let store = Self::new();
        for path in paths {
            store.insert(path);
        }
        store
    }

    /// Create a store whose listings always fail with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let store = Self::new();
        store.fail_with(message);
        store
    }

    /// Add an object path
    pub fn insert(&self, path: impl Into<String>) {
        self.objects
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(StoredObject::new(path));
    }

    /// Make subsequent listings fail
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = Some(message.into());
    }

    /// Get operation counts for assertions
    pub fn operation_counts(&self) -> OperationCounts {
        self.operations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reset operation counts
    pub fn reset_counts(&self) {
        *self.operations.write().unwrap_or_else(PoisonError::into_inner) =
            OperationCounts::default();
    }
}

#[async_trait]
impl ObjectLister for MemoryObjectStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredObject>> {
        self.operations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .lists += 1;

        if let Some(message) = self
            .failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(CoreError::Listing { message });
        }

        let prefix = normalize_prefix(prefix);
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        Ok(objects
            .iter()
            .filter(|o| normalize_prefix(&o.path).starts_with(prefix))
            .cloned()
            .collect())
    }
}
