//! The canonical failure record and its per-origin constructors.
//!
//! Every interception point normalizes its own failure shape into a
//! [`FailureRecord`] before any shared logic runs; the handling funnel never
//! branches on where a failure came from.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::{Display, Formatter};
use std::io;
use std::panic::PanicHookInfo;
use std::path::Path;

use crate::severity::Severity;

/// File and line a failure originated from, when known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Path of the originating source file.
    pub file: String,
    /// One-based line number within that file.
    pub line: u32,
}

impl Display for SourceLocation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.file, self.line)
    }
}

/// A fatal condition observable only at process end.
///
/// Recorded via [`crate::report::record_fatal`] and consumed by the shutdown
/// hook, which turns it into a [`FailureRecord`]. Late-stage conditions often
/// have incomplete context, so the source location is optional.
#[derive(Debug, Clone)]
pub struct FatalCondition {
    /// Severity the condition was recorded with.
    pub severity: Severity,
    /// Human-readable description.
    pub message: String,
    /// Origin, when the recording site still knew it.
    pub source: Option<SourceLocation>,
}

impl FatalCondition {
    /// New condition without source context.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            source: None,
        }
    }

    /// Attach the originating file and line.
    #[must_use]
    pub fn at(mut self, file: impl Into<String>, line: u32) -> Self {
        self.source = Some(SourceLocation {
            file: file.into(),
            line,
        });
        self
    }
}

/// Canonical representation of one captured failure.
///
/// Constructed fresh at the moment a hook fires and consumed exactly once by
/// the handling funnel; it is never stored, retried, or mutated.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    /// Human-readable description of the failure.
    pub message: String,
    /// Classification from the originating failure.
    pub severity: Severity,
    /// Origin file and line, when known.
    pub source: Option<SourceLocation>,
    /// Full verbose rendering: severity, message, origin, and any captured
    /// call-stack context. Used verbatim for logging and verbose exposure.
    pub rendered: String,
}

impl FailureRecord {
    /// Normalize a recoverable-error report.
    ///
    /// Captures a backtrace only when the environment asks for one
    /// (`RUST_BACKTRACE`), matching how cheap a recoverable report should be.
    #[must_use]
    pub fn from_report(
        severity: Severity,
        message: impl Into<String>,
        file: impl Into<String>,
        line: u32,
    ) -> Self {
        let message = message.into();
        let source = Some(SourceLocation {
            file: file.into(),
            line,
        });
        let rendered = render(severity, &message, source.as_ref(), &Backtrace::capture());
        Self {
            message,
            severity,
            source,
            rendered,
        }
    }

    /// Normalize an uncaught panic.
    ///
    /// The payload is downcast to the two string shapes `panic!` produces;
    /// anything else gets a placeholder message. The backtrace is always
    /// captured since the process is about to terminate anyway.
    #[must_use]
    pub fn from_panic(info: &PanicHookInfo<'_>) -> Self {
        let message = info
            .payload()
            .downcast_ref::<&str>()
            .map(|msg| (*msg).to_owned())
            .or_else(|| info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic with non-string payload".to_owned());
        let source = info.location().map(|location| SourceLocation {
            file: location.file().to_owned(),
            line: location.line(),
        });
        let rendered = render(
            Severity::Fatal,
            &message,
            source.as_ref(),
            &Backtrace::force_capture(),
        );
        Self {
            message,
            severity: Severity::Fatal,
            source,
            rendered,
        }
    }

    /// Normalize a fatal condition found at shutdown.
    #[must_use]
    pub fn from_fatal(fatal: FatalCondition) -> Self {
        let FatalCondition {
            severity,
            message,
            source,
        } = fatal;
        let rendered = render(severity, &message, source.as_ref(), &Backtrace::disabled());
        Self {
            message,
            severity,
            source,
            rendered,
        }
    }

    /// Normalize the constructor's own writability-probe failure.
    #[must_use]
    pub fn from_probe_failure(destination: &Path, err: &io::Error) -> Self {
        let message = format!(
            "log destination {} is not writable: {err}",
            destination.display()
        );
        let rendered = render(Severity::Fatal, &message, None, &Backtrace::capture());
        Self {
            message,
            severity: Severity::Fatal,
            source: None,
            rendered,
        }
    }
}

fn render(
    severity: Severity,
    message: &str,
    source: Option<&SourceLocation>,
    backtrace: &Backtrace,
) -> String {
    let mut rendered = match source {
        Some(location) => format!("{severity}: {message} at {location}"),
        None => format!("{severity}: {message}"),
    };
    if backtrace.status() == BacktraceStatus::Captured {
        rendered.push_str("\nstack backtrace:\n");
        rendered.push_str(&backtrace.to_string());
    }
    rendered
}
