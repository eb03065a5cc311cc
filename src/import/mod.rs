//! Dump import pipeline.
//!
//! Streams a dump line by line, tracks the collection chosen by the most
//! recent selector, and hands every record to a [`RecordSink`]. Records are
//! imported one at a time: the next line is not read until the sink has
//! finished with the current one.
//!
//! # Submodules
//!
//! - [`sink`] - `mongoimport` and dry-run destinations

pub mod sink;

pub use sink::{DryRun, InvocationOutcome, MongoImport, RecordSink};

use std::fs::File;
use std::io::{BufRead, BufReader, Write};

use chrono::Utc;
use unifi_dump::{DumpLine, LineScanner};

use crate::config::{FailurePolicy, ImportConfig};
use crate::error::{RestoreError, Result};
use crate::format::{ImportReport, format_collection_notice};

/// Open the dump named by `config` and wrap it in a bounded scanner.
///
/// # Errors
///
/// Returns `DumpOpen` if the file cannot be opened, or `Dump` if the line
/// buffer cannot be reserved.
pub fn open_dump(config: &ImportConfig) -> Result<LineScanner<BufReader<File>>> {
    let file = File::open(&config.dump).map_err(|source| RestoreError::DumpOpen {
        path: config.dump.clone(),
        source,
    })?;
    Ok(LineScanner::new(BufReader::new(file), config.limits)?)
}

/// Run a complete import as described by `config`, writing the audit trail
/// to `out`.
///
/// # Errors
///
/// Returns an error if the dump cannot be opened or scanned, if `out` cannot
/// be written, or, under [`FailurePolicy::FailFast`], if any record fails.
pub fn restore<W: Write + ?Sized>(config: &ImportConfig, out: &mut W) -> Result<ImportReport> {
    let mut scanner = open_dump(config)?;
    let mut report = ImportReport::new(
        config.dump.display().to_string(),
        config.policy,
        config.limits,
    );
    report.dry_run = config.dry_run;

    let result = if config.dry_run {
        Importer::new(DryRun::new(config.target.clone()), config.policy).run(
            &mut scanner,
            out,
            &mut report,
        )
    } else {
        Importer::new(MongoImport::new(config.target.clone()), config.policy).run(
            &mut scanner,
            out,
            &mut report,
        )
    };

    if let Err(err) = result {
        tracing::error!(
            last_line = scanner.line_number(),
            records = report.records,
            imported = report.imported,
            failed = report.failed,
            "Import aborted: {err}"
        );
        return Err(err);
    }
    Ok(report)
}

/// Drives records from a scanner into a sink.
pub struct Importer<S> {
    sink: S,
    policy: FailurePolicy,
}

impl<S: RecordSink> Importer<S> {
    #[must_use]
    pub const fn new(sink: S, policy: FailurePolicy) -> Self {
        Self { sink, policy }
    }

    #[must_use]
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Import every record of `scanner`, updating `report` as lines go by.
    ///
    /// On error `report` holds the counts up to the failing line.
    ///
    /// # Errors
    ///
    /// Returns scanner errors, output write errors, and, under fail-fast,
    /// the first failed record.
    pub fn run<R: BufRead, W: Write + ?Sized>(
        &mut self,
        scanner: &mut LineScanner<R>,
        out: &mut W,
        report: &mut ImportReport,
    ) -> Result<()> {
        let mut collection = String::new();
        let mut current: Option<usize> = None;

        while let Some((number, line)) = scanner.next_line()? {
            report.lines += 1;
            match DumpLine::classify(line) {
                DumpLine::Select(name) => {
                    report.selectors += 1;
                    name.clone_into(&mut collection);
                    current = Some(report.collection_index(name));
                    tracing::info!(line = number, collection = name, "Selected collection");
                    writeln!(out, "{}", format_collection_notice(name))?;
                }
                DumpLine::Record(payload) => {
                    let idx = if let Some(idx) = current {
                        idx
                    } else {
                        tracing::warn!(
                            line = number,
                            "Record before any collection selector; importing into ''"
                        );
                        let idx = report.collection_index(&collection);
                        current = Some(idx);
                        idx
                    };
                    report.records += 1;
                    report.collections[idx].records += 1;
                    self.import_record(number, &collection, payload, idx, out, report)?;
                }
            }
            out.flush()?;
        }

        report.finished_at = Utc::now();
        tracing::info!(
            lines = report.lines,
            records = report.records,
            imported = report.imported,
            failed = report.failed,
            "Import finished"
        );
        Ok(())
    }

    fn import_record<W: Write + ?Sized>(
        &mut self,
        number: usize,
        collection: &str,
        payload: &[u8],
        idx: usize,
        out: &mut W,
        report: &mut ImportReport,
    ) -> Result<()> {
        writeln!(out, "{}", self.sink.describe(collection, payload))?;
        out.flush()?;

        let status = match self.sink.import(collection, payload) {
            Ok(outcome) => {
                out.write_all(&outcome.stdout)?;
                out.write_all(&outcome.stderr)?;
                if outcome.success {
                    report.imported += 1;
                    return Ok(());
                }
                outcome.status()
            }
            // The tool could not be started or fed its input.
            Err(err @ (RestoreError::Spawn { .. } | RestoreError::Io(_))) => {
                if self.policy == FailurePolicy::FailFast {
                    report.failed += 1;
                    report.collections[idx].failed += 1;
                    return Err(err);
                }
                err.to_string()
            }
            Err(err) => return Err(err),
        };

        report.failed += 1;
        report.collections[idx].failed += 1;
        match self.policy {
            FailurePolicy::BestEffort => {
                tracing::warn!(line = number, collection, "Import failed: {status}");
                Ok(())
            }
            FailurePolicy::FailFast => Err(RestoreError::ImportFailed {
                line: number,
                collection: collection.to_string(),
                status,
            }),
        }
    }
}
