//! Command-line interface for `unifi_restore`.
//!
//! This module provides the CLI parsing and run dispatch using clap.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser};
use unifi_dump::{DEFAULT_BUFFER_SIZE_GB, DEFAULT_TOKEN_SIZE_MB};

use crate::config::{
    ConfigInputs, DEFAULT_DB, DEFAULT_HOST, DEFAULT_TOOL, FailurePolicy, ImportConfig,
};
use crate::format::OutputContext;
use crate::import;
use crate::logging::{self, LogFormat};

/// unifi-restore - replay a UniFi autobackup dump into MongoDB.
#[derive(Parser, Debug)]
#[command(name = "unifi-restore")]
#[command(
    author,
    version,
    about = "Restore a UniFi controller autobackup dump into MongoDB, one document at a time",
    long_about = None,
    after_help = "Each record is piped into its own mongoimport process. Reruns re-submit every record."
)]
pub struct Cli {
    /// Path to the dump file (newline-delimited JSON)
    pub dump: PathBuf,

    #[command(flatten)]
    pub scan: ScanArgs,

    #[command(flatten)]
    pub target: TargetArgs,

    /// What to do when a record fails to import
    #[arg(
        long = "on-error",
        env = "UNIFI_RESTORE_ON_ERROR",
        value_enum,
        default_value_t = FailurePolicy::BestEffort
    )]
    pub on_error: FailurePolicy,

    /// Print the import commands without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Print the run report as JSON (audit trail goes to stderr)
    #[arg(long)]
    pub json: bool,

    /// Verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Line scanner sizing.
#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Line buffer to reserve up front, in GB
    #[arg(
        long,
        env = "BUFFER_SIZE_GB",
        default_value_t = DEFAULT_BUFFER_SIZE_GB,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub buffer_size_gb: u64,

    /// Longest accepted line, in MB
    #[arg(
        long,
        env = "TOKEN_SIZE_MB",
        default_value_t = DEFAULT_TOKEN_SIZE_MB,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub token_size_mb: u64,
}

/// Import destination.
#[derive(Args, Debug)]
pub struct TargetArgs {
    /// MongoDB host:port of the controller
    #[arg(long, env = "UNIFI_RESTORE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Database name
    #[arg(long, env = "UNIFI_RESTORE_DB", default_value = DEFAULT_DB)]
    pub db: String,

    /// Import client executable
    #[arg(long, env = "UNIFI_RESTORE_TOOL", default_value = DEFAULT_TOOL)]
    pub import_tool: String,
}

impl Cli {
    #[must_use]
    pub fn config_inputs(&self) -> ConfigInputs {
        ConfigInputs {
            dump: self.dump.clone(),
            buffer_size_gb: self.scan.buffer_size_gb,
            token_size_mb: self.scan.token_size_mb,
            tool: self.target.import_tool.clone(),
            host: self.target.host.clone(),
            db: self.target.db.clone(),
            policy: self.on_error,
            dry_run: self.dry_run,
        }
    }
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the import fails.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose, cli.quiet, cli.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let config = ImportConfig::resolve(cli.config_inputs())?;
    tracing::debug!(?config, "Resolved configuration");

    let ctx = OutputContext::from_flags(cli.json);
    let mut audit = ctx.audit_writer();
    let report = import::restore(&config, &mut *audit)?;
    drop(audit);

    ctx.report(&report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "unifi-restore",
            "dump.json",
            "--buffer-size-gb",
            "1",
            "--token-size-mb",
            "8",
            "--db",
            "ace_stat",
            "--on-error",
            "fail-fast",
        ])
        .unwrap();
        let inputs = cli.config_inputs();
        assert_eq!(inputs.buffer_size_gb, 1);
        assert_eq!(inputs.token_size_mb, 8);
        assert_eq!(inputs.db, "ace_stat");
        assert_eq!(inputs.policy, FailurePolicy::FailFast);
    }

    #[test]
    fn test_non_numeric_size_rejected() {
        let err = Cli::try_parse_from(["unifi-restore", "dump.json", "--token-size-mb", "lots"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(
            Cli::try_parse_from(["unifi-restore", "dump.json", "--buffer-size-gb", "0"]).is_err()
        );
    }

    #[test]
    fn test_dump_is_required() {
        let err = Cli::try_parse_from(["unifi-restore"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }
}
