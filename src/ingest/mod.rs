//! Sample ingestion.
//!
//! This module provides:
//! - [`parse_sample_line`]: validation of one device line into a [`Sample`]
//! - [`LineSource`]: a [`SampleSource`] over any buffered async reader
//! - [`open_source`]: stdin or a device/file path, as configured
//!
//! Bytes that are not valid UTF-8 are replaced rather than rejected;
//! serial links routinely deliver a garbled first line.

mod parsing;

pub use parsing::parse_sample_line;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::error::IngestError;
use crate::sensors::Sample;
use crate::traits::SampleSource;

/// Source value that selects standard input.
pub const STDIN_SOURCE: &str = "-";

/// Reads newline-delimited sensor lines from an async reader.
#[derive(Debug)]
pub struct LineSource<R> {
    reader: R,
    buffer: Vec<u8>,
    lines_read: u64,
}

impl<R: AsyncBufRead + Unpin + Send> LineSource<R> {
    /// Wrap a buffered reader.
    #[must_use]
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            buffer: Vec::new(),
            lines_read: 0,
        }
    }

    /// Number of raw lines consumed so far, including skipped ones.
    #[must_use]
    pub const fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

#[async_trait]
impl<R: AsyncBufRead + Unpin + Send> SampleSource for LineSource<R> {
    async fn next_sample(&mut self) -> Result<Sample, IngestError> {
        loop {
            self.buffer.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.buffer)
                .await
                .map_err(|e| IngestError::Io {
                    message: e.to_string(),
                })?;
            if read == 0 {
                return Err(IngestError::Closed);
            }
            self.lines_read += 1;

            let line = String::from_utf8_lossy(&self.buffer);
            match parse_sample_line(&line) {
                Ok(Some(sample)) => return Ok(sample),
                Ok(None) => {
                    tracing::trace!(line = %line.trim(), "Skipping line without sample");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Open the configured sensor source.
///
/// `"-"` reads standard input; anything else is opened as a file, which
/// covers serial TTY devices configured out of band (e.g. with `stty`).
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the path cannot be opened.
pub async fn open_source(source: &str) -> Result<Box<dyn SampleSource>, IngestError> {
    if source == STDIN_SOURCE {
        return Ok(Box::new(LineSource::new(BufReader::new(tokio::io::stdin()))));
    }

    let file = tokio::fs::File::open(source)
        .await
        .map_err(|e| IngestError::Io {
            message: format!("Failed to open {source}: {e}"),
        })?;
    Ok(Box::new(LineSource::new(BufReader::new(file))))
}
