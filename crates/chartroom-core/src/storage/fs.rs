//! Filesystem object store
//!
//! Every regular file below the root is an object; its path is the
//! `/`-joined path relative to the root.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::{ObjectLister, StoredObject, normalize_prefix};
use crate::error::{CoreError, Result};

/// Object store backed by a local directory tree
#[derive(Debug, Clone)]
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Blocking walk, run on the blocking pool by `list_objects`
    fn walk(root: &Path, prefix: &str) -> Result<Vec<StoredObject>> {
        if !root.is_dir() {
            return Err(CoreError::RootNotFound {
                path: root.display().to_string(),
            });
        }

        let mut objects = Vec::new();
        for entry in walkdir::WalkDir::new(root).follow_links(true) {
            // Only an unreadable root fails the listing; broken links and
            // loops below it are skipped
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(CoreError::Listing {
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::debug!(root = %root.display(), "skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let rel = match entry.path().strip_prefix(root) {
                Ok(p) => p,
                Err(_) => continue,
            };
            let path = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if path.starts_with(prefix) {
                objects.push(StoredObject { path });
            }
        }

        Ok(objects)
    }
}

#[async_trait]
impl ObjectLister for FsObjectStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn list_objects(&self, prefix: &str) -> Result<Vec<StoredObject>> {
        let root = self.root.clone();
        let prefix = normalize_prefix(prefix).to_string();

        tokio::task::spawn_blocking(move || Self::walk(&root, &prefix))
            .await
            .map_err(|e| CoreError::Listing {
                message: format!("listing task failed: {}", e),
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"").unwrap();
    }

    fn sorted_paths(objects: Vec<StoredObject>) -> Vec<String> {
        let mut paths: Vec<String> = objects.into_iter().map(|o| o.path).collect();
        paths.sort();
        paths
    }

    #[tokio::test]
    async fn test_list_all_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "repoA/charts/webapp-0.1.0.tgz");
        touch(dir.path(), "repoB/api-1.0.0.tgz");
        touch(dir.path(), "index.yaml");
        std::fs::create_dir_all(dir.path().join("empty")).unwrap();

        let store = FsObjectStore::new(dir.path());
        let objects = store.list_objects("").await.unwrap();

        assert_eq!(
            sorted_paths(objects),
            vec![
                "index.yaml",
                "repoA/charts/webapp-0.1.0.tgz",
                "repoB/api-1.0.0.tgz",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_with_prefix() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "repoA/charts/webapp-0.1.0.tgz");
        touch(dir.path(), "repoB/api-1.0.0.tgz");

        let store = FsObjectStore::new(dir.path());
        let objects = store.list_objects("/repoA").await.unwrap();

        assert_eq!(sorted_paths(objects), vec!["repoA/charts/webapp-0.1.0.tgz"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_broken_links_are_skipped() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "t1/charts/a.tgz");
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("t2-link")).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("t1/loop")).unwrap();

        let store = FsObjectStore::new(dir.path());
        let objects = store.list_objects("").await.unwrap();

        assert_eq!(sorted_paths(objects), vec!["t1/charts/a.tgz"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_linked_directories_are_listed() {
        let dir = TempDir::new().unwrap();
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "charts/a-1.0.0.tgz");
        std::os::unix::fs::symlink(outside.path(), dir.path().join("linked")).unwrap();

        let store = FsObjectStore::new(dir.path());
        let objects = store.list_objects("").await.unwrap();

        assert_eq!(sorted_paths(objects), vec!["linked/charts/a-1.0.0.tgz"]);
    }

    #[tokio::test]
    async fn test_missing_root_is_error() {
        let dir = TempDir::new().unwrap();
        let store = FsObjectStore::new(dir.path().join("does-not-exist"));

        let result = store.list_objects("").await;
        assert!(matches!(result, Err(CoreError::RootNotFound { .. })));
    }
}
