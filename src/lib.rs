//! `unifi_restore` - UniFi autobackup dump importer
//!
//! This crate provides the core functionality for the `unifi-restore` CLI,
//! which replays a controller dump into MongoDB one document at a time.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`cli`] - Command-line interface using clap
//! - [`config`] - Layered configuration (defaults, environment, flags)
//! - [`import`] - Streaming import pipeline and record sinks
//! - [`format`] - Output formatting (text, JSON)
//! - [`logging`] - tracing subscriber setup
//! - [`error`] - Error types and handling
//!
//! Line scanning and selector recognition live in the `unifi-dump` crate.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod import;
pub mod logging;

pub use error::{RestoreError, Result};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the import fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}

/// Process exit code for an error returned by [`run`].
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<RestoreError>()
        .map_or(1, RestoreError::exit_code)
}
