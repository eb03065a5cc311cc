//! Bounded line scanner.
//!
//! Dumps of large controllers carry single lines of hundreds of megabytes,
//! so the scanner reuses one pre-sized buffer for every line and refuses to
//! grow it past `max_line`.

use std::io::{BufRead, ErrorKind};

use serde::Serialize;

use crate::error::{DumpError, Result};

const GIB: u64 = 1024 * 1024 * 1024;
const MIB: u64 = 1024 * 1024;

/// Default buffer reservation, in gigabytes.
pub const DEFAULT_BUFFER_SIZE_GB: u64 = 5;

/// Default maximum line size, in megabytes (1 GiB).
pub const DEFAULT_TOKEN_SIZE_MB: u64 = 1024;

/// Buffer sizing for a [`LineScanner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScanLimits {
    /// Bytes to reserve up front for the line buffer.
    pub buffer_capacity: usize,
    /// Longest accepted line in bytes, excluding its terminator.
    pub max_line: usize,
}

impl ScanLimits {
    /// Build limits from gigabyte/megabyte overrides.
    ///
    /// # Errors
    ///
    /// Returns `SizeOverflow` if either size does not fit in `usize`.
    pub fn from_units(buffer_size_gb: u64, token_size_mb: u64) -> Result<Self> {
        Ok(Self {
            buffer_capacity: to_bytes(buffer_size_gb, GIB, "GiB")?,
            max_line: to_bytes(token_size_mb, MIB, "MiB")?,
        })
    }

    /// The reservation actually made: no accepted line is longer than
    /// `max_line`, so reserving more would never be used.
    #[must_use]
    pub fn reservation(&self) -> usize {
        self.buffer_capacity.min(self.max_line)
    }
}

impl Default for ScanLimits {
    fn default() -> Self {
        // 5 GiB does not fit a 32-bit usize; saturate there.
        Self {
            buffer_capacity: to_bytes(DEFAULT_BUFFER_SIZE_GB, GIB, "GiB").unwrap_or(usize::MAX),
            max_line: to_bytes(DEFAULT_TOKEN_SIZE_MB, MIB, "MiB").unwrap_or(usize::MAX),
        }
    }
}

fn to_bytes(value: u64, unit_bytes: u64, unit: &'static str) -> Result<usize> {
    value
        .checked_mul(unit_bytes)
        .and_then(|bytes| usize::try_from(bytes).ok())
        .ok_or(DumpError::SizeOverflow { value, unit })
}

/// Reads `\n`-terminated lines with an upper bound on line length.
///
/// A trailing `\r` is stripped, and a final line without a newline is still
/// yielded.
pub struct LineScanner<R> {
    reader: R,
    buf: Vec<u8>,
    max_line: usize,
    line_number: usize,
}

impl<R: BufRead> LineScanner<R> {
    /// Create a scanner, reserving the line buffer up front.
    ///
    /// # Errors
    ///
    /// Returns `BufferAllocation` if the reservation cannot be satisfied.
    pub fn new(reader: R, limits: ScanLimits) -> Result<Self> {
        let bytes = limits.reservation();
        let mut buf = Vec::new();
        buf.try_reserve_exact(bytes)
            .map_err(|_| DumpError::BufferAllocation { bytes })?;
        tracing::debug!(
            reserved = bytes,
            max_line = limits.max_line,
            "Line buffer reserved"
        );

        Ok(Self {
            reader,
            buf,
            max_line: limits.max_line,
            line_number: 0,
        })
    }

    /// Number of lines yielded so far.
    #[must_use]
    pub const fn line_number(&self) -> usize {
        self.line_number
    }

    /// Read the next line.
    ///
    /// Returns `Ok(None)` at end of input. The returned slice is valid until
    /// the next call.
    ///
    /// # Errors
    ///
    /// Returns `LineTooLong` if the line exceeds `max_line` bytes, or `Read`
    /// if the underlying reader fails.
    pub fn next_line(&mut self) -> Result<Option<(usize, &[u8])>> {
        self.buf.clear();
        let line = self.line_number + 1;
        let mut saw_any = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => return Err(DumpError::Read { line, source }),
            };
            if available.is_empty() {
                break;
            }
            saw_any = true;

            let newline = available.iter().position(|&b| b == b'\n');
            let chunk = newline.map_or(available, |i| &available[..i]);

            // A `\r` right before the newline is not counted against the limit.
            let pending = self.buf.len() + chunk.len();
            let ends_with_cr = chunk.last().or_else(|| self.buf.last()) == Some(&b'\r');
            let counted = if newline.is_some() && ends_with_cr {
                pending - 1
            } else {
                pending
            };
            if counted > self.max_line.saturating_add(1)
                || (newline.is_some() && counted > self.max_line)
            {
                return Err(DumpError::LineTooLong {
                    line,
                    limit: self.max_line,
                });
            }

            self.buf.extend_from_slice(chunk);
            let consumed = newline.map_or(chunk.len(), |i| i + 1);
            self.reader.consume(consumed);

            if newline.is_some() {
                break;
            }
        }

        if !saw_any {
            return Ok(None);
        }

        if self.buf.last() == Some(&b'\r') {
            self.buf.pop();
        }
        // Unterminated final line.
        if self.buf.len() > self.max_line {
            return Err(DumpError::LineTooLong {
                line,
                limit: self.max_line,
            });
        }

        self.line_number = line;
        Ok(Some((line, self.buf.as_slice())))
    }
}
