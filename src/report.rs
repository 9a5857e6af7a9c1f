//! Process-wide error-reporting facility.
//!
//! The runtime-level collaborators the hooks plug into: the active severity
//! filter (which reports are actionable), the registered error sink (where
//! recoverable-error reports are delivered), and the last-fatal slot the
//! shutdown hook inspects at process end.
//!
//! All three are process-global by nature; they stand in for the host
//! runtime's own interception points. Policy stays on the
//! [`FailureTrap`](crate::FailureTrap) instance; nothing here decides what
//! gets logged or exposed.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::handler::FailureTrap;
use crate::record::FatalCondition;
use crate::severity::{Severity, SeverityFilter};

static SEVERITY_FILTER: AtomicU8 = AtomicU8::new(SeverityFilter::all().bits());
static ERROR_SINK: RwLock<Option<Arc<FailureTrap>>> = RwLock::new(None);
static LAST_FATAL: Mutex<Option<FatalCondition>> = Mutex::new(None);

/// Currently active severity filter. Defaults to every severity.
#[must_use]
pub fn severity_filter() -> SeverityFilter {
    SeverityFilter::from_bits(SEVERITY_FILTER.load(Ordering::Relaxed))
}

/// Replace the active severity filter.
///
/// Intended for single-threaded setup, before any hook can fire.
pub fn set_severity_filter(filter: SeverityFilter) {
    SEVERITY_FILTER.store(filter.bits(), Ordering::Relaxed);
}

/// Deliver a recoverable-error report to the registered interceptor.
///
/// A no-op when no interceptor was registered via
/// [`catch_errors`](crate::catch_errors). When the report's severity is
/// excluded by the active filter the interceptor ignores it; otherwise this
/// call does not return — the failure pipeline terminates the process.
pub fn report_error(severity: Severity, message: &str, file: &str, line: u32) {
    let sink = ERROR_SINK
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone();
    if let Some(trap) = sink {
        trap.on_error(severity, message, file, line);
    }
}

/// Record a fatal condition for the shutdown hook to find.
///
/// Mirrors a runtime's "last error" slot: conditions that bypass the panic
/// hook entirely (resource exhaustion, aborted subsystems) are recorded here
/// and handled at process end.
pub fn record_fatal(fatal: FatalCondition) {
    *LAST_FATAL.lock().unwrap_or_else(PoisonError::into_inner) = Some(fatal);
}

/// Take the pending fatal condition, leaving the slot empty.
#[must_use]
pub fn take_last_fatal() -> Option<FatalCondition> {
    LAST_FATAL
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
}

pub(crate) fn install_error_sink(trap: Arc<FailureTrap>) {
    *ERROR_SINK.write().unwrap_or_else(PoisonError::into_inner) = Some(trap);
}
