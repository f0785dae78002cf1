//! Newline-delimited JSON writer
//!
//! Provides line-at-a-time serialization of [`Row`]s.

use crate::error::{Error, Result};
use crate::row::Row;
use std::io::Write;

/// Writes one JSON object per line
pub struct NdjsonWriter<W: Write> {
    /// Underlying output
    inner: W,
    /// Reused encode buffer holding exactly one line
    line: Vec<u8>,
    /// Destination name for error messages
    destination: String,
    /// Number of rows written
    rows_written: u64,
}

impl<W: Write> NdjsonWriter<W> {
    /// Create a new writer
    pub fn new(inner: W, destination: impl Into<String>) -> Self {
        Self {
            inner,
            line: Vec::with_capacity(1024),
            destination: destination.into(),
            rows_written: 0,
        }
    }

    /// Encode a row and write it, newline included, in one call.
    ///
    /// The row is fully encoded before anything reaches the output, so an
    /// encoding failure never leaves a partial line behind.
    pub fn write_row(&mut self, row: &Row) -> Result<()> {
        self.line.clear();
        serde_json::to_writer(&mut self.line, row)
            .map_err(|e| Error::sink(&self.destination, format!("Failed to encode row: {e}")))?;
        self.line.push(b'\n');

        self.inner
            .write_all(&self.line)
            .map_err(|e| Error::sink(&self.destination, e))?;

        self.rows_written += 1;
        Ok(())
    }

    /// Get the number of rows written so far
    #[must_use]
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Flush buffered output
    pub fn flush(&mut self) -> Result<()> {
        self.inner
            .flush()
            .map_err(|e| Error::sink(&self.destination, e))
    }

    /// Flush and hand back the underlying output
    pub fn finish(mut self) -> Result<W> {
        self.flush()?;
        Ok(self.inner)
    }
}
