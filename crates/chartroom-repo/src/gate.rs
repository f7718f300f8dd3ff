//! Access gate for repository listing

use chartroom_core::FeatureFlags;

/// Process-wide permission, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessGate {
    allowed: bool,
}

impl AccessGate {
    pub fn new(allowed: bool) -> Self {
        Self { allowed }
    }

    /// Gate for `GET /api/repositories`
    pub fn for_listing(flags: &FeatureFlags) -> Self {
        Self::new(flags.allow_list_repos)
    }

    pub fn allows(&self) -> bool {
        self.allowed
    }
}

impl Default for AccessGate {
    fn default() -> Self {
        Self::new(true)
    }
}
