//! Local directory-tree discovery
//!
//! Each immediate subdirectory of the root is a candidate repository. It
//! qualifies when it holds at least one chart archive, either nested
//! (`<repo>/charts/*.tgz`) or flat (`<repo>/*.tgz`).
//!
//! Filesystem problems never fail the request: they make this strategy
//! inapplicable so the object listing can answer instead.

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::discovery::{Attempt, Discoverer, InapplicableReason};
use crate::error::Result;

/// Chart archive file names
const ARCHIVE_PATTERN: &str = "*.tgz";

/// Directories that may hold archives, relative to the repository
const ARCHIVE_DIRS: &[&[&str]] = &[&["charts"], &[]];

/// Scans a local chart root directly
#[derive(Debug, Clone, Default)]
pub struct LocalTreeDiscoverer {
    root: Option<PathBuf>,
}

impl LocalTreeDiscoverer {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }

    /// Blocking scan of `root`
    pub fn scan(root: Option<&Path>) -> Attempt {
        let Some(root) = root else {
            return Attempt::Inapplicable(InapplicableReason::RootNotConfigured);
        };

        match std::fs::metadata(root) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Attempt::Inapplicable(InapplicableReason::RootNotDirectory),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Attempt::Inapplicable(InapplicableReason::RootMissing);
            }
            Err(e) => {
                tracing::debug!(root = %root.display(), "cannot stat local root: {}", e);
                return Attempt::Inapplicable(InapplicableReason::ReadFailed);
            }
        }

        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::debug!(root = %root.display(), "cannot read local root: {}", e);
                return Attempt::Inapplicable(InapplicableReason::ReadFailed);
            }
        };

        let pattern = match glob::Pattern::new(ARCHIVE_PATTERN) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::debug!("invalid archive pattern: {}", e);
                return Attempt::Inapplicable(InapplicableReason::ReadFailed);
            }
        };

        let mut names = BTreeSet::new();
        for entry in entries.filter_map(|e| e.ok()) {
            // Symlinks are not followed, matching a plain directory listing
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if !is_dir {
                continue;
            }

            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };

            if has_chart_archive(&entry.path(), &pattern) {
                names.insert(name);
            }
        }

        if names.is_empty() {
            return Attempt::Inapplicable(InapplicableReason::NoRepositories);
        }

        Attempt::Found(names.into_iter().collect())
    }
}

/// Whether a repository directory holds an archive in any layout
///
/// Unreadable layout directories count as holding nothing.
fn has_chart_archive(repo_dir: &Path, pattern: &glob::Pattern) -> bool {
    ARCHIVE_DIRS.iter().any(|parts| {
        let dir = parts.iter().fold(repo_dir.to_path_buf(), |p, part| p.join(part));
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return false;
        };

        entries
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_str().is_some_and(|n| pattern.matches(n)))
    })
}

#[async_trait]
impl Discoverer for LocalTreeDiscoverer {
    fn name(&self) -> &'static str {
        "local-tree"
    }

    async fn attempt(&self) -> Result<Attempt> {
        let root = self.root.clone();

        match tokio::task::spawn_blocking(move || Self::scan(root.as_deref())).await {
            Ok(attempt) => Ok(attempt),
            Err(e) => {
                tracing::debug!("local tree scan task failed: {}", e);
                Ok(Attempt::Inapplicable(InapplicableReason::ReadFailed))
            }
        }
    }
}
