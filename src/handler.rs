//! The failure trap — normalization policy and the single `handle` funnel.

use std::path::PathBuf;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use crate::channel::{ResponseChannel, TerminalChannel};
use crate::config::TrapConfig;
use crate::record::FailureRecord;
use crate::report;
use crate::severity::Severity;
use crate::sink::LogSink;

/// Body sent to the caller while failure exposure is disabled.
pub const GENERIC_BODY: &str = "An error has occurred";

/// Exit status applied after the failure response is written.
pub const FAILURE_STATUS: i32 = 1;

/// Process-wide uncaught-failure interceptor.
///
/// One instance owns the whole policy: the log destination, the exposure
/// flags, and the response channel. Hooks registered through
/// [`crate::hooks`] normalize their failure shape into a [`FailureRecord`]
/// and forward it to [`handle`](Self::handle), which logs, responds, and
/// terminates, always in that order.
pub struct FailureTrap {
    sink: LogSink,
    expose: AtomicBool,
    verbose: AtomicBool,
    channel: Mutex<Box<dyn ResponseChannel>>,
}

impl FailureTrap {
    /// Trap writing responses to standard output, optionally logging to
    /// `log_file`.
    ///
    /// A provided destination is probed for writability first. If the probe
    /// fails, the probe failure itself becomes a [`FailureRecord`] and runs
    /// through the trap's own pipeline — the process terminates rather than
    /// silently losing every subsequent failure entry, and no filename is
    /// retained.
    #[must_use]
    pub fn new(log_file: Option<PathBuf>) -> Arc<Self> {
        Self::from_config(TrapConfig {
            log_file,
            ..TrapConfig::default()
        })
    }

    /// Trap configured from `config`, writing responses to standard output.
    #[must_use]
    pub fn from_config(config: TrapConfig) -> Arc<Self> {
        Self::with_channel(config, TerminalChannel::stdout())
    }

    /// Trap writing responses through an explicit channel.
    ///
    /// Request-serving hosts install an [`crate::HttpChannel`] over the
    /// active connection here; tests install in-memory channels.
    #[must_use]
    pub fn with_channel(config: TrapConfig, channel: impl ResponseChannel + 'static) -> Arc<Self> {
        let mut trap = Self {
            sink: LogSink::new(None),
            expose: AtomicBool::new(config.expose_failures),
            verbose: AtomicBool::new(config.verbose_failures),
            channel: Mutex::new(Box::new(channel)),
        };
        if let Some(path) = config.log_file {
            match LogSink::probe(&path) {
                Ok(()) => trap.sink = LogSink::new(Some(path)),
                Err(err) => {
                    let record = FailureRecord::from_probe_failure(&path, &err);
                    trap.handle(record);
                }
            }
        }
        Arc::new(trap)
    }

    /// Enable showing failure detail to the caller.
    pub fn expose_failures(&self) {
        self.expose.store(true, Ordering::Relaxed);
    }

    /// Enable verbose rendering when detail is exposed.
    ///
    /// Kept for API parity with the exposure toggle; the exposed body is
    /// always the full rendered form, so this flag currently has no effect
    /// independent of [`expose_failures`](Self::expose_failures).
    pub fn verbose_failures(&self) {
        self.verbose.store(true, Ordering::Relaxed);
    }

    /// Whether failure detail is shown to the caller.
    #[must_use]
    pub fn is_exposing(&self) -> bool {
        self.expose.load(Ordering::Relaxed)
    }

    /// Whether verbose rendering is enabled.
    #[must_use]
    pub fn is_verbose(&self) -> bool {
        self.verbose.load(Ordering::Relaxed)
    }

    /// Configured log destination, if the trap kept one.
    #[must_use]
    pub fn log_destination(&self) -> Option<&std::path::Path> {
        self.sink.destination()
    }

    /// Normalize a recoverable-error report, honoring the active severity
    /// filter.
    ///
    /// Returns `None` when the severity is excluded — the hook must stay
    /// silent for severities the host has filtered out.
    #[must_use]
    pub fn screen_report(
        severity: Severity,
        message: &str,
        file: &str,
        line: u32,
    ) -> Option<FailureRecord> {
        if !report::severity_filter().contains(severity) {
            return None;
        }
        Some(FailureRecord::from_report(severity, message, file, line))
    }

    /// Recoverable-error hook body.
    ///
    /// Excluded severities are ignored without any side effect; included
    /// ones run the full pipeline, so this call then never returns.
    pub fn on_error(&self, severity: Severity, message: &str, file: &str, line: u32) {
        if let Some(record) = Self::screen_report(severity, message, file, line) {
            self.handle(record);
        }
    }

    /// Run both side effects for `record` and return the exit status.
    ///
    /// Side effect 1: write the record's rendered form to the log sink.
    /// Side effect 2: send the caller-facing body, generic unless exposure
    /// is enabled, in which case the full rendered form. The two are
    /// independent sequential writes; a sink failure never suppresses the
    /// response. Both are best-effort and never retried.
    #[must_use]
    pub fn dispatch(&self, record: &FailureRecord) -> i32 {
        if let Err(err) = self.sink.write(record) {
            warn!(%err, "failure log write failed");
        }

        let body = if self.is_exposing() {
            record.rendered.as_str()
        } else {
            GENERIC_BODY
        };

        let mut channel = self.channel.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(err) = channel.send_failure(body) {
            warn!(%err, "failure response write failed");
        }

        FAILURE_STATUS
    }

    /// The single funnel: log, respond, terminate.
    ///
    /// Consumes the record and never returns — no further process code
    /// executes after the response is written.
    // Takes the record by value: it must not outlive the pipeline's single pass.
    #[allow(clippy::needless_pass_by_value)]
    pub fn handle(&self, record: FailureRecord) -> ! {
        let status = self.dispatch(&record);
        process::exit(status);
    }

    /// Discard output staged in the response channel but not yet flushed.
    ///
    /// The shutdown hook calls this before handling a pending fatal
    /// condition so partial prior output never precedes the response.
    pub fn discard_buffered(&self) {
        let mut channel = self.channel.lock().unwrap_or_else(PoisonError::into_inner);
        channel.discard_buffered();
    }
}
