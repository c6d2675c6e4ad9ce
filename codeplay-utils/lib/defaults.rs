//! Default values shared across the codeplay crates.

use std::{path::PathBuf, sync::LazyLock};

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The default endpoint of the remote execution service.
pub const DEFAULT_API_URL: &str = "https://emkc.org/api/v2/piston/execute";

/// The default hard ceiling for a single execution, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// The default minimum gap between two runs of the same session, in milliseconds.
pub const DEFAULT_COOLDOWN_MS: u64 = 2_000;

/// The user agent sent with every execution request.
pub const DEFAULT_USER_AGENT: &str = concat!("codeplay/", env!("CARGO_PKG_VERSION"));

/// The sub directory of the codeplay home where edited snippets are kept.
pub const SOURCES_SUBDIR: &str = "sources";

/// The file extension used for persisted snippet files.
pub const SOURCE_FILE_EXTENSION: &str = "src";

/// The default codeplay home directory.
pub static DEFAULT_CODEPLAY_HOME: LazyLock<PathBuf> = LazyLock::new(|| {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".codeplay")
});
