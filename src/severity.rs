//! Failure severities and the process error-reporting filter.

use std::fmt::{Display, Formatter};

/// Classification of a recoverable runtime error or fatal condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Informational condition worth surfacing but rarely actionable.
    Notice,
    /// Use of a facility scheduled for removal.
    Deprecation,
    /// A condition the host can continue past, but should not ignore.
    Warning,
    /// A condition the process cannot continue past.
    Fatal,
}

impl Severity {
    /// Every severity, lowest to highest.
    pub const ALL: [Self; 4] = [
        Self::Notice,
        Self::Deprecation,
        Self::Warning,
        Self::Fatal,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::Notice => 0b0001,
            Self::Deprecation => 0b0010,
            Self::Warning => 0b0100,
            Self::Fatal => 0b1000,
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Notice => "notice",
            Self::Deprecation => "deprecation",
            Self::Warning => "warning",
            Self::Fatal => "fatal",
        };
        f.write_str(name)
    }
}

/// The set of severities the host currently considers actionable.
///
/// Mirrors a runtime error-reporting mask: a recoverable-error report whose
/// severity is not in the active filter is silently ignored by the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeverityFilter(u8);

impl SeverityFilter {
    const ALL_BITS: u8 = 0b1111;

    /// Filter containing every severity.
    #[must_use]
    pub const fn all() -> Self {
        Self(Self::ALL_BITS)
    }

    /// Empty filter; every report is suppressed.
    #[must_use]
    pub const fn none() -> Self {
        Self(0)
    }

    /// Copy of this filter with `severity` included.
    #[must_use]
    pub const fn with(self, severity: Severity) -> Self {
        Self(self.0 | severity.bit())
    }

    /// Copy of this filter with `severity` excluded.
    #[must_use]
    pub const fn without(self, severity: Severity) -> Self {
        Self(self.0 & !severity.bit())
    }

    /// Whether `severity` is considered actionable by this filter.
    #[must_use]
    pub const fn contains(self, severity: Severity) -> bool {
        self.0 & severity.bit() != 0
    }

    /// Build a filter from an explicit severity list.
    #[must_use]
    pub fn from_severities(severities: &[Severity]) -> Self {
        severities
            .iter()
            .fold(Self::none(), |filter, severity| filter.with(*severity))
    }

    pub(crate) const fn bits(self) -> u8 {
        self.0
    }

    pub(crate) const fn from_bits(bits: u8) -> Self {
        Self(bits & Self::ALL_BITS)
    }
}

impl Default for SeverityFilter {
    fn default() -> Self {
        Self::all()
    }
}
