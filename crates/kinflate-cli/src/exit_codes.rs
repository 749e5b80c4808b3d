//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// Success - operation completed without errors
pub const SUCCESS: i32 = 0;

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Build error - a transformer, generator or patch failed
pub const BUILD_ERROR: i32 = 3;

/// Manifest error - missing or invalid Kube-manifest.yaml, or an invalid resource file
pub const MANIFEST_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;
