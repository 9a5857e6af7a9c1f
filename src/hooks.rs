//! Registration adapters for the three interception points.
//!
//! Each adapter is a thin shim between a host-runtime mechanism and the one
//! [`FailureTrap::handle`] funnel: the panic hook, the error-report sink,
//! and an end-of-process guard. They normalize and forward; no policy
//! lives here.

use std::process;
use std::sync::Arc;

use crate::handler::FailureTrap;
use crate::record::FailureRecord;
use crate::report;

/// Register all three interception points: recoverable-error reports,
/// shutdown inspection, and uncaught panics.
///
/// The returned guard must live until process end — typically bound in the
/// host's `main`.
#[must_use = "the shutdown hook only runs while the guard is alive"]
pub fn catch_all(trap: &Arc<FailureTrap>) -> ShutdownGuard {
    catch_errors(trap);
    let guard = catch_shutdown(trap);
    catch_panics(trap);
    guard
}

/// Register the trap as the sink for [`report_error`](crate::report_error)
/// deliveries.
pub fn catch_errors(trap: &Arc<FailureTrap>) {
    report::install_error_sink(Arc::clone(trap));
}

/// Install the trap as the process panic hook.
///
/// Replaces any previously installed hook. Once a panic reaches the hook the
/// pipeline runs to its terminating conclusion; unwinding never resumes.
pub fn catch_panics(trap: &Arc<FailureTrap>) {
    let trap = Arc::clone(trap);
    std::panic::set_hook(Box::new(move |info| {
        let record = FailureRecord::from_panic(info);
        trap.handle(record);
    }));
}

/// Register the end-of-process backstop.
///
/// Some fatal conditions bypass the panic hook entirely and are observable
/// only at shutdown, so this hook is required even with
/// [`catch_panics`] installed.
#[must_use = "the shutdown hook only runs while the guard is alive"]
pub fn catch_shutdown(trap: &Arc<FailureTrap>) -> ShutdownGuard {
    ShutdownGuard {
        trap: Arc::clone(trap),
    }
}

/// Inspect the last-fatal slot; when a condition is pending, discard staged
/// output and run both pipeline side effects.
///
/// Returns the exit status to apply, or `None` on the normal exit path.
/// [`ShutdownGuard`] applies the status on drop; calling this directly is
/// the testable core of the shutdown hook.
#[must_use]
pub fn on_shutdown(trap: &FailureTrap) -> Option<i32> {
    let fatal = report::take_last_fatal()?;
    trap.discard_buffered();
    let record = FailureRecord::from_fatal(fatal);
    Some(trap.dispatch(&record))
}

/// RAII handle for the shutdown interception point.
///
/// Dropped at process end (normal or abnormal), it checks whether a fatal
/// condition was recorded late enough to bypass the other hooks. On the
/// normal exit path it does nothing.
#[must_use = "the shutdown hook only runs while the guard is alive"]
pub struct ShutdownGuard {
    trap: Arc<FailureTrap>,
}

impl Drop for ShutdownGuard {
    fn drop(&mut self) {
        if let Some(status) = on_shutdown(&self.trap) {
            process::exit(status);
        }
    }
}
