//! Standard exit codes for CLI operations
//!
//! Each failure class gets its own non-zero code.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Configuration error - invalid or incomplete configuration
pub const CONFIG_ERROR: i32 = 2;

/// Disabled - the operation is turned off by a feature flag
pub const DISABLED: i32 = 3;

/// Storage error - the storage listing failed
pub const STORAGE_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
