//! CLI commands

pub mod discover;
pub mod serve;

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use chartroom_core::{FsObjectStore, MemoryObjectStore, ObjectLister, ServerConfig, StorageBackend};
use chartroom_repo::RepositoryDiscovery;

use crate::error::{CliError, Result};

/// Configuration sources shared by every command
///
/// Flags and environment variables override values from `--config`.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// YAML configuration file
    #[arg(short = 'c', long = "config", env = "CHARTROOM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Storage backend: local or memory
    #[arg(long, env = "STORAGE")]
    pub storage: Option<StorageBackend>,

    /// Root directory of the local chart storage
    #[arg(long = "storage-local-rootdir", env = "STORAGE_LOCAL_ROOTDIR")]
    pub storage_local_rootdir: Option<PathBuf>,

    /// Allow listing repositories (true/false)
    #[arg(long, env = "ALLOW_LIST_REPOS", value_parser = clap::builder::BoolishValueParser::new())]
    pub allow_list_repos: Option<bool>,

    /// Allow the cross-repository chart listing (true/false)
    #[arg(long, env = "ALLOW_CHARTS_ALL", value_parser = clap::builder::BoolishValueParser::new())]
    pub allow_charts_all: Option<bool>,

    /// Maximum objects examined when listing storage (0 = unlimited)
    #[arg(long, env = "REPO_LIST_MAX_OBJECTS")]
    pub repo_list_max_objects: Option<usize>,

    /// Address to bind the HTTP server to
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Port to bind the HTTP server to
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,
}

impl ConfigArgs {
    /// Resolve the final configuration: file, then flags and environment
    pub fn resolve(&self) -> Result<ServerConfig> {
        let mut config = ServerConfig::load_or_default(self.config.as_deref())?;

        if let Some(backend) = self.storage {
            config.storage.backend = backend;
        }
        if let Some(root) = &self.storage_local_rootdir {
            config.storage.local_root_dir = Some(root.clone());
        }
        if let Some(allow) = self.allow_list_repos {
            config.features.allow_list_repos = allow;
        }
        if let Some(allow) = self.allow_charts_all {
            config.features.allow_charts_all = allow;
        }
        if let Some(max) = self.repo_list_max_objects {
            config.features.repo_list_max_objects = max;
        }
        if let Some(host) = &self.host {
            config.listen.host = host.clone();
        }
        if let Some(port) = self.port {
            config.listen.port = port;
        }

        config.validate()?;
        Ok(config)
    }
}

/// Object store for the configured backend
pub fn build_lister(config: &ServerConfig) -> Result<Arc<dyn ObjectLister>> {
    match config.storage.backend {
        StorageBackend::Local => {
            let root = config.storage.local_root_dir.clone().ok_or_else(|| {
                CliError::config_with_help(
                    "no storage root configured for the local backend",
                    "pass --storage-local-rootdir, set STORAGE_LOCAL_ROOTDIR, or use STORAGE=memory",
                )
            })?;
            Ok(Arc::new(FsObjectStore::new(root)))
        }
        StorageBackend::Memory => Ok(Arc::new(MemoryObjectStore::with_paths(
            config.storage.memory_objects.iter().cloned(),
        ))),
    }
}

/// Build the discovery chain over the configured backend
pub fn build_discovery(config: &ServerConfig) -> Result<RepositoryDiscovery> {
    let lister = build_lister(config)?;
    tracing::debug!(backend = lister.backend_name(), "storage backend selected");
    Ok(RepositoryDiscovery::from_config(config, lister))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "storage:\n  localRootDir: /from/file\nfeatures:\n  allowListRepos: false\n  repoListMaxObjects: 10\n"
        )
        .unwrap();

        let args = ConfigArgs {
            config: Some(file.path().to_path_buf()),
            storage_local_rootdir: Some(PathBuf::from("/from/flag")),
            allow_list_repos: Some(true),
            port: Some(9090),
            ..Default::default()
        };

        let config = args.resolve().unwrap();
        assert_eq!(
            config.storage.local_root_dir,
            Some(PathBuf::from("/from/flag"))
        );
        assert!(config.features.allow_list_repos);
        assert_eq!(config.features.repo_list_max_objects, 10);
        assert_eq!(config.listen.port, 9090);
    }

    #[test]
    fn test_local_backend_without_root_is_config_error() {
        let err = ConfigArgs::default().resolve().unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_memory_backend_without_root() {
        let args = ConfigArgs {
            storage: Some(StorageBackend::Memory),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.storage.tree_scan_root().is_none());

        let lister = build_lister(&config).unwrap();
        assert_eq!(lister.backend_name(), "memory");
    }

    #[test]
    fn test_memory_backend_skips_tree_scan() {
        let args = ConfigArgs {
            storage: Some(StorageBackend::Memory),
            storage_local_rootdir: Some(PathBuf::from("/srv")),
            ..Default::default()
        };
        let config = args.resolve().unwrap();
        assert!(config.storage.tree_scan_root().is_none());
    }

    #[tokio::test]
    async fn test_memory_backend_discovery_falls_back() {
        let mut config = ServerConfig::default();
        config.storage.backend = StorageBackend::Memory;
        config.storage.memory_objects = vec![
            "t1/charts/a.tgz".to_string(),
            "t2/b.tgz".to_string(),
            "noslash".to_string(),
        ];

        let names = build_discovery(&config).unwrap().discover().await.unwrap();
        assert_eq!(names, vec!["t1", "t2"]);
    }
}
