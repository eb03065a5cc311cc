//! Error types for `unifi_restore`.

use std::path::PathBuf;

use thiserror::Error;
use unifi_dump::DumpError;

/// Primary error type for restore runs.
#[derive(Error, Debug)]
pub enum RestoreError {
    // === Input Errors ===
    /// The dump file could not be opened.
    #[error("cannot open dump {}: {source}", path.display())]
    DumpOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dump could not be scanned (oversized line, read failure).
    #[error(transparent)]
    Dump(#[from] DumpError),

    // === Import Errors ===
    /// The import tool could not be started.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The import tool reported failure for a record (fail-fast only).
    #[error("import of line {line} into collection '{collection}' failed: {status}")]
    ImportFailed {
        line: usize,
        collection: String,
        status: String,
    },

    // === Configuration Errors ===
    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// Writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl RestoreError {
    /// Process exit code for this error: 2 for configuration problems,
    /// matching clap's usage errors, 1 for everything else.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }
}

/// Result type using `RestoreError`.
pub type Result<T> = std::result::Result<T, RestoreError>;
