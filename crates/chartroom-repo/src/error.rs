//! Error types for repository discovery

use chartroom_core::CoreError;
use thiserror::Error;

/// Discovery errors
///
/// Strategy inapplicability is not an error; see [`crate::Attempt`].
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("listing repositories is disabled")]
    Disabled,

    /// Listing failure, surfaced with the backend's message unchanged
    #[error(transparent)]
    Storage(#[from] CoreError),
}

/// Result type for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;
