//! Interceptor configuration.
//!
//! All policy lives in a value owned by the [`crate::FailureTrap`] instance;
//! there is no config file and no ambient global. Flags are set through
//! direct calls during single-threaded setup.

use std::path::PathBuf;

/// Configuration applied at trap construction.
///
/// The safe default is everything off: no log destination (the default
/// diagnostic sink is used) and a terse, generic caller-facing message.
#[derive(Debug, Clone, Default)]
pub struct TrapConfig {
    /// Optional file the log side effect appends to. Probed for writability
    /// at construction.
    pub log_file: Option<PathBuf>,
    /// Show failure detail to the caller instead of the generic message.
    /// Expected to stay off outside trusted/debug contexts, since the
    /// rendered form may carry file paths and internal state.
    pub expose_failures: bool,
    /// Reserved rendering-depth toggle; has no effect independent of
    /// `expose_failures` (the exposed body is always the full rendered form).
    pub verbose_failures: bool,
}

impl TrapConfig {
    /// Config with a log destination and everything else defaulted.
    #[must_use]
    pub fn with_log_file(path: impl Into<PathBuf>) -> Self {
        Self {
            log_file: Some(path.into()),
            ..Self::default()
        }
    }
}
