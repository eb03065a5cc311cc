//! Destinations for dump records.

use std::io::{self, ErrorKind, Write};
use std::process::{Command, Stdio};
use std::thread;

use crate::config::ImportTarget;
use crate::error::{RestoreError, Result};
use crate::format::format_import_command;

/// Result of importing one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOutcome {
    pub success: bool,
    /// Exit code, `None` if the tool was killed by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl InvocationOutcome {
    /// An outcome for a record that was accepted without running anything.
    #[must_use]
    pub fn skipped() -> Self {
        Self {
            success: true,
            code: Some(0),
            ..Self::default()
        }
    }

    /// Human-readable exit status.
    #[must_use]
    pub fn status(&self) -> String {
        self.code.map_or_else(
            || "terminated by signal".to_string(),
            |code| format!("exit status {code}"),
        )
    }
}

/// Something that can import one record into a collection.
pub trait RecordSink {
    /// Import `payload` into `collection`.
    ///
    /// A tool that runs and reports failure is an `Ok` outcome with
    /// `success == false`; only failing to run at all is an `Err`.
    ///
    /// # Errors
    ///
    /// Returns `Spawn` if the import tool cannot be started, or `Io` if the
    /// payload cannot be handed over.
    fn import(&mut self, collection: &str, payload: &[u8]) -> Result<InvocationOutcome>;

    /// The command line printed to the audit trail before `import`.
    fn describe(&self, collection: &str, payload: &[u8]) -> String;
}

/// Pipes each record into a `mongoimport` process.
#[derive(Debug, Clone)]
pub struct MongoImport {
    target: ImportTarget,
}

impl MongoImport {
    #[must_use]
    pub const fn new(target: ImportTarget) -> Self {
        Self { target }
    }

    fn command(&self, collection: &str) -> Command {
        let mut cmd = Command::new(&self.target.tool);
        cmd.args([
            "--host",
            self.target.host.as_str(),
            "--db",
            self.target.db.as_str(),
            "--collection",
            collection,
        ])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
        cmd
    }
}

impl RecordSink for MongoImport {
    fn import(&mut self, collection: &str, payload: &[u8]) -> Result<InvocationOutcome> {
        let mut child = self
            .command(collection)
            .spawn()
            .map_err(|source| RestoreError::Spawn {
                tool: self.target.tool.clone(),
                source,
            })?;

        // The tool may fill its stdout/stderr pipes before it finishes
        // reading stdin, so output is drained while the payload is written.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = stdin.map(|mut stdin| {
                scope.spawn(move || {
                    // Dropping stdin on return signals end of input.
                    stdin
                        .write_all(payload)
                        .and_then(|()| stdin.write_all(b"\n"))
                })
            });
            let output = child.wait_with_output();
            let written = writer.map_or(Ok(()), |handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")))
            });
            (written, output)
        });

        let output = output?;
        match written {
            Ok(()) => {}
            // The tool exited without reading; its status tells the story.
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                tracing::debug!(collection, "Import tool closed stdin early");
            }
            Err(e) => return Err(RestoreError::Io(e)),
        }

        Ok(InvocationOutcome {
            success: output.status.success(),
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    fn describe(&self, collection: &str, payload: &[u8]) -> String {
        format_import_command(&self.target, collection, payload)
    }
}

/// Prints the audit trail without running anything.
#[derive(Debug, Clone)]
pub struct DryRun {
    target: ImportTarget,
}

impl DryRun {
    #[must_use]
    pub const fn new(target: ImportTarget) -> Self {
        Self { target }
    }
}

impl RecordSink for DryRun {
    fn import(&mut self, _collection: &str, _payload: &[u8]) -> Result<InvocationOutcome> {
        Ok(InvocationOutcome::skipped())
    }

    fn describe(&self, collection: &str, payload: &[u8]) -> String {
        format_import_command(&self.target, collection, payload)
    }
}
