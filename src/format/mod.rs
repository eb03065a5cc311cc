//! Output formatting for `unifi_restore`.
//!
//! Supports human-readable text output and machine-parseable JSON.
//! In JSON mode stdout carries only the final [`ImportReport`]; the audit
//! trail and import tool output move to stderr.

mod output;
mod text;

use std::io::{self, Write};

pub use output::{CollectionStats, ImportReport};
pub use text::{format_collection_notice, format_import_command, format_summary, shell_quote};

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Routes the audit trail and the run report to the right streams.
#[derive(Debug, Clone, Copy)]
pub struct OutputContext {
    mode: OutputMode,
}

impl OutputContext {
    #[must_use]
    pub const fn from_flags(json: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        Self { mode }
    }

    /// Stream for collection notices, import commands and tool output.
    #[must_use]
    pub fn audit_writer(&self) -> Box<dyn Write> {
        match self.mode {
            OutputMode::Text => Box::new(io::stdout()),
            OutputMode::Json => Box::new(io::stderr()),
        }
    }

    /// Print the end-of-run report.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization or the write fails.
    pub fn report(&self, report: &ImportReport) -> Result<()> {
        let mut stdout = io::stdout().lock();
        match self.mode {
            OutputMode::Json => writeln!(stdout, "{}", serde_json::to_string_pretty(report)?)?,
            OutputMode::Text => writeln!(stdout, "{}", format_summary(report))?,
        }
        stdout.flush()?;
        Ok(())
    }
}
