//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use chartroom_core::CoreError;
use chartroom_repo::DiscoveryError;
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Configuration could not be loaded or is incomplete
    #[error("Configuration error: {message}")]
    #[diagnostic(code(chartroom::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Operation turned off by a feature flag
    #[error("{message}")]
    #[diagnostic(
        code(chartroom::cli::disabled),
        help("set ALLOW_LIST_REPOS=true or features.allowListRepos in the config file")
    )]
    Disabled { message: String },

    /// Storage listing failed
    #[error("Storage error: {message}")]
    #[diagnostic(code(chartroom::cli::storage))]
    Storage { message: String },

    /// HTTP server failed to bind or crashed
    #[error("Server error: {message}")]
    #[diagnostic(code(chartroom::cli::server))]
    Server { message: String },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(chartroom::cli::io))]
    Io { message: String },

    /// Internal error (runtime, unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(chartroom::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Disabled { .. } => exit_codes::DISABLED,
            CliError::Storage { .. } => exit_codes::STORAGE_ERROR,
            CliError::Server { .. } => exit_codes::ERROR,
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create a configuration error with help text
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a server error
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidConfig { message } => CliError::Config {
                message,
                help: Some("pass --storage-local-rootdir or --config <file.yaml>".to_string()),
            },
            CoreError::YamlParse(e) => CliError::Config {
                message: e.to_string(),
                help: None,
            },
            CoreError::RootNotFound { .. } | CoreError::Listing { .. } => CliError::Storage {
                message: err.to_string(),
            },
            CoreError::Io(e) => CliError::Io {
                message: e.to_string(),
            },
        }
    }
}

impl From<DiscoveryError> for CliError {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::Disabled => CliError::Disabled {
                message: err.to_string(),
            },
            DiscoveryError::Storage(e) => CliError::Storage {
                message: e.to_string(),
            },
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
