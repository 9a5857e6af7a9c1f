//! Error types shared across the crate.

use std::fmt::{Display, Formatter};

/// Shared result type for the two best-effort I/O seams.
pub type Result<T> = std::result::Result<T, TrapError>;

/// Failures of the pipeline's own side effects.
///
/// Nothing propagates these past [`crate::FailureTrap::dispatch`]: log and
/// response writes are best-effort, and the pipeline itself never raises.
#[derive(Debug)]
pub enum TrapError {
    /// The log sink could not be opened or appended to.
    Log(String),
    /// The caller-facing response channel could not be written.
    Channel(String),
}

impl Display for TrapError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Log(msg) => write!(f, "log: {msg}"),
            Self::Channel(msg) => write!(f, "channel: {msg}"),
        }
    }
}

impl std::error::Error for TrapError {}
