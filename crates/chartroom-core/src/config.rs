//! Server configuration
//!
//! Loaded from an optional YAML file and then overridden by command-line flags
//! and environment variables. The resolved `ServerConfig` is built once at
//! startup and shared read-only for the lifetime of the process.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Top-level server configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to
    pub listen: ListenConfig,

    /// Storage backend settings
    pub storage: StorageConfig,

    /// Feature toggles
    pub features: FeatureFlags,
}

impl ServerConfig {
    /// Load configuration from a YAML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` when given, defaults otherwise
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(p),
            None => Ok(Self::default()),
        }
    }

    /// Check that the configuration can back a running server.
    ///
    /// Only the local backend needs a root, as the directory its object
    /// store lists. The memory backend runs without one.
    pub fn validate(&self) -> Result<()> {
        if self.storage.backend == StorageBackend::Local && self.storage.local_root_dir.is_none() {
            return Err(CoreError::InvalidConfig {
                message: "the local storage backend needs storage.localRootDir \
                          (set STORAGE_LOCAL_ROOTDIR, or STORAGE=memory)"
                    .to_string(),
            });
        }
        Ok(())
    }
}

/// Listen address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListenConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ListenConfig {
    /// `host:port` string suitable for binding
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Object store behind the listing contract
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Directory tree under `localRootDir`
    #[default]
    Local,

    /// In-process store seeded from `memoryObjects`
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "memory" => Ok(Self::Memory),
            other => Err(CoreError::InvalidConfig {
                message: format!("unknown storage backend '{}' (expected local or memory)", other),
            }),
        }
    }
}

/// Storage settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    /// Backend answering object listings
    pub backend: StorageBackend,

    /// Root directory of the local filesystem store
    pub local_root_dir: Option<PathBuf>,

    /// Object paths the memory backend starts with
    pub memory_objects: Vec<String>,
}

impl StorageConfig {
    /// Root handed to the local-tree scan
    ///
    /// The scan only makes sense over a local filesystem, so other backends
    /// never get one.
    pub fn tree_scan_root(&self) -> Option<&Path> {
        match self.backend {
            StorageBackend::Local => self.local_root_dir.as_deref(),
            StorageBackend::Memory => None,
        }
    }
}

/// Process-wide feature toggles
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeatureFlags {
    /// Permit `GET /api/repositories`
    pub allow_list_repos: bool,

    /// Permit the cross-repository chart aggregation endpoint
    pub allow_charts_all: bool,

    /// Cap on objects examined by the generic scan (0 = unlimited)
    pub repo_list_max_objects: usize,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            allow_list_repos: true,
            allow_charts_all: false,
            repo_list_max_objects: 0,
        }
    }
}
