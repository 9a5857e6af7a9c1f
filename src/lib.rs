#![forbid(unsafe_code)]

//! `failtrap` — process-wide uncaught-failure interceptor.
//!
//! A last line of defense for an application host (CLI tool or
//! request-serving process): recoverable runtime errors, uncaught panics,
//! and fatal shutdown conditions are normalized into one [`FailureRecord`]
//! and routed through a single pipeline that writes the log entry, writes
//! the caller-facing response, and terminates the process with a failure
//! status.
//!
//! Typical wiring from a host `main`:
//!
//! ```no_run
//! use failtrap::{catch_all, FailureTrap};
//!
//! let trap = FailureTrap::new(Some("/var/log/app-failures.log".into()));
//! // Detail stays in the log by default; opt in for trusted contexts only.
//! // trap.expose_failures();
//! let _guard = catch_all(&trap);
//! ```

pub mod channel;
pub mod config;
pub mod errors;
pub mod handler;
pub mod hooks;
pub mod record;
pub mod report;
pub mod severity;
pub mod sink;

pub use channel::{HttpChannel, ResponseChannel, TerminalChannel};
pub use config::TrapConfig;
pub use errors::{Result, TrapError};
pub use handler::{FailureTrap, FAILURE_STATUS, GENERIC_BODY};
pub use hooks::{catch_all, catch_errors, catch_panics, catch_shutdown, on_shutdown, ShutdownGuard};
pub use record::{FailureRecord, FatalCondition, SourceLocation};
pub use report::{record_fatal, report_error, set_severity_filter, severity_filter, take_last_fatal};
pub use severity::{Severity, SeverityFilter};
