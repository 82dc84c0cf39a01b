//! Exit code constants for the fct-provision CLI.
//!
//! - 0: Success
//! - 1: Configuration error (bad branch, category, slug or config file)
//! - 2: Network failure (fetch failed, timed out or returned a non-2xx status)
//! - 3: Archive failure (downloaded content is not a valid ZIP container)
//! - 4: Filesystem failure (missing expected path, write or move failure)

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// Configuration error: detected before any I/O, never worth retrying.
pub const CONFIG_ERROR: i32 = 1;

/// Network failure: transient, callers may retry.
pub const NETWORK_FAILURE: i32 = 2;

/// Archive failure: corrupt or invalid ZIP content.
pub const ARCHIVE_FAILURE: i32 = 3;

/// Filesystem failure: missing subpath, unreadable file, failed move.
pub const FILESYSTEM_FAILURE: i32 = 4;
