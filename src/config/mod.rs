//! Configuration management for `unifi_restore`.
//!
//! Configuration is layered, lowest precedence first:
//! - Built-in defaults (5 GiB buffer, 1 GiB max line, `mongoimport` against
//!   `localhost:27117/ace`)
//! - Environment variables (`BUFFER_SIZE_GB`, `TOKEN_SIZE_MB`,
//!   `UNIFI_RESTORE_*`)
//! - Command-line flags
//!
//! clap resolves the layers; this module validates the result and turns it
//! into an [`ImportConfig`].

use std::path::PathBuf;

use clap::ValueEnum;
use serde::Serialize;
use unifi_dump::ScanLimits;

use crate::error::{RestoreError, Result};

pub const DEFAULT_HOST: &str = "localhost:27117";
pub const DEFAULT_DB: &str = "ace";
pub const DEFAULT_TOOL: &str = "mongoimport";

/// What to do when a single record fails to import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Print the tool output, count the failure, keep going.
    #[default]
    BestEffort,
    /// Stop the run at the first failed record.
    FailFast,
}

impl FailurePolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BestEffort => "best-effort",
            Self::FailFast => "fail-fast",
        }
    }
}

/// Where records are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportTarget {
    /// Import client executable, looked up on `PATH` when not a path.
    pub tool: String,
    /// `host:port` of the controller's MongoDB.
    pub host: String,
    /// Database name.
    pub db: String,
}

impl Default for ImportTarget {
    fn default() -> Self {
        Self {
            tool: DEFAULT_TOOL.to_string(),
            host: DEFAULT_HOST.to_string(),
            db: DEFAULT_DB.to_string(),
        }
    }
}

/// Fully resolved settings for one import run.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    pub dump: PathBuf,
    pub limits: ScanLimits,
    pub target: ImportTarget,
    pub policy: FailurePolicy,
    pub dry_run: bool,
}

/// Raw values as parsed from flags and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigInputs {
    pub dump: PathBuf,
    pub buffer_size_gb: u64,
    pub token_size_mb: u64,
    pub tool: String,
    pub host: String,
    pub db: String,
    pub policy: FailurePolicy,
    pub dry_run: bool,
}

impl ImportConfig {
    /// Validate raw inputs and resolve byte sizes.
    ///
    /// # Errors
    ///
    /// Returns `Config` if a size is zero or overflows, or a target field is
    /// blank.
    pub fn resolve(inputs: ConfigInputs) -> Result<Self> {
        if inputs.buffer_size_gb == 0 {
            return Err(RestoreError::Config(
                "buffer size must be at least 1 GB".to_string(),
            ));
        }
        if inputs.token_size_mb == 0 {
            return Err(RestoreError::Config(
                "maximum line size must be at least 1 MB".to_string(),
            ));
        }
        let limits = ScanLimits::from_units(inputs.buffer_size_gb, inputs.token_size_mb)
            .map_err(|e| RestoreError::Config(e.to_string()))?;

        for (name, value) in [
            ("import tool", &inputs.tool),
            ("host", &inputs.host),
            ("database", &inputs.db),
        ] {
            if value.trim().is_empty() {
                return Err(RestoreError::Config(format!("{name} cannot be empty")));
            }
        }

        Ok(Self {
            dump: inputs.dump,
            limits,
            target: ImportTarget {
                tool: inputs.tool,
                host: inputs.host,
                db: inputs.db,
            },
            policy: inputs.policy,
            dry_run: inputs.dry_run,
        })
    }
}
