//! Error types for `unifi-dump`.

use thiserror::Error;

/// Errors raised while scanning a dump.
///
/// Every variant is fatal for an import run: the scanner cannot resume past
/// a line it failed to read.
#[derive(Error, Debug)]
pub enum DumpError {
    /// A line is longer than the configured maximum.
    #[error("line {line} exceeds the maximum line size of {limit} bytes")]
    LineTooLong { line: usize, limit: usize },

    /// The underlying reader failed.
    #[error("read error at line {line}: {source}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// The scanner buffer could not be reserved.
    #[error("cannot reserve a {bytes}-byte line buffer")]
    BufferAllocation { bytes: usize },

    /// A size override does not fit in memory addresses on this platform.
    #[error("size {value} {unit} overflows usize")]
    SizeOverflow { value: u64, unit: &'static str },
}

/// Result type using `DumpError`.
pub type Result<T> = std::result::Result<T, DumpError>;
