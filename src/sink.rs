//! Log sink — the first of the two unconditional side effects.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::errors::{Result, TrapError};
use crate::record::FailureRecord;

/// Timestamp layout for file entries: `03-Aug-2026 14:07:31 +0000`.
const STAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S %z";

/// Destination for the log side effect.
///
/// With a configured file, each record is appended as one
/// timestamp-prefixed, newline-terminated line. Without one, the rendered
/// form goes to the process's diagnostic facility (a `tracing` error event)
/// and no timestamp is added here; the host's subscriber owns formatting.
#[derive(Debug, Clone, Default)]
pub struct LogSink {
    destination: Option<PathBuf>,
}

impl LogSink {
    /// Sink writing to `destination`, or to the diagnostic facility when
    /// `None`.
    #[must_use]
    pub fn new(destination: Option<PathBuf>) -> Self {
        Self { destination }
    }

    /// Check that `destination` accepts appends, creating it if absent.
    ///
    /// The trap constructor runs this before keeping a destination, so an
    /// unusable path surfaces immediately instead of silently losing every
    /// subsequent failure entry.
    ///
    /// # Errors
    ///
    /// Returns the underlying `io::Error` when the open fails.
    pub fn probe(destination: &Path) -> io::Result<()> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(destination)
            .map(|_| ())
    }

    /// Configured file destination, if any.
    #[must_use]
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// Append one entry for `record`.
    ///
    /// # Errors
    ///
    /// Returns [`TrapError::Log`] when the file destination cannot be opened
    /// or written. The caller treats this as best-effort and never retries.
    pub fn write(&self, record: &FailureRecord) -> Result<()> {
        match &self.destination {
            Some(path) => {
                let mut file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|err| {
                        TrapError::Log(format!("cannot open {}: {err}", path.display()))
                    })?;
                let stamp = Local::now().format(STAMP_FORMAT);
                writeln!(file, "[{stamp}] {}", record.rendered).map_err(|err| {
                    TrapError::Log(format!("cannot append to {}: {err}", path.display()))
                })?;
                Ok(())
            }
            None => {
                tracing::error!(severity = %record.severity, "{}", record.rendered);
                Ok(())
            }
        }
    }
}
