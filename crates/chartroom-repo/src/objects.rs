//! Object-listing discovery
//!
//! Works for any backend that can list object paths. A repository is
//! everything before the first `/charts/` segment, which allows nested
//! repository paths; without such a segment the first path segment is used.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

use chartroom_core::ObjectLister;

use crate::discovery::{Attempt, Discoverer};
use crate::error::Result;

const CHARTS_SEGMENT: &str = "/charts/";

/// Infer the repository an object path belongs to
///
/// ```
/// use chartroom_repo::infer_repository;
///
/// assert_eq!(infer_repository("repoA/charts/webapp-0.1.0.tgz"), Some("repoA"));
/// assert_eq!(infer_repository("org/team/charts/api-1.0.0.tgz"), Some("org/team"));
/// assert_eq!(infer_repository("repoB/webapp-0.2.0.tgz"), Some("repoB"));
/// assert_eq!(infer_repository("justafile.tgz"), None);
/// ```
pub fn infer_repository(path: &str) -> Option<&str> {
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return None;
    }

    match path.find(CHARTS_SEGMENT) {
        Some(idx) if idx > 0 => return Some(&path[..idx]),
        _ => {}
    }

    match path.find('/') {
        Some(idx) if idx > 0 => Some(&path[..idx]),
        _ => None,
    }
}

/// Derives repositories from a full object listing
#[derive(Clone)]
pub struct ObjectDiscoverer {
    lister: Arc<dyn ObjectLister>,
    prefix: String,
    max_objects: usize,
}

impl ObjectDiscoverer {
    /// Discoverer over the whole store
    pub fn new(lister: Arc<dyn ObjectLister>) -> Self {
        Self {
            lister,
            prefix: String::new(),
            max_objects: 0,
        }
    }

    /// Restrict the listing to a subtree
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Examine at most `max` objects (0 = unlimited)
    pub fn with_max_objects(mut self, max: usize) -> Self {
        self.max_objects = max;
        self
    }

    /// List once and collect sorted, unique repository names
    pub async fn discover(&self) -> Result<Vec<String>> {
        let objects = self.lister.list_objects(&self.prefix).await?;

        let limit = match self.max_objects {
            0 => usize::MAX,
            n => n,
        };
        if objects.len() > limit {
            tracing::debug!(
                backend = self.lister.backend_name(),
                listed = objects.len(),
                limit,
                "object listing truncated"
            );
        }

        let names: BTreeSet<&str> = objects
            .iter()
            .take(limit)
            .filter_map(|o| infer_repository(&o.path))
            .collect();

        Ok(names.into_iter().map(str::to_string).collect())
    }
}

#[async_trait]
impl Discoverer for ObjectDiscoverer {
    fn name(&self) -> &'static str {
        "object-listing"
    }

    async fn attempt(&self) -> Result<Attempt> {
        self.discover().await.map(Attempt::Found)
    }
}
