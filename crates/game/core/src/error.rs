//! Error classification shared across the bestiary crates.
//!
//! Concrete errors live next to the code that raises them (for example
//! [`AssetError`](crate::env::AssetError)); this module only holds the severity
//! taxonomy and the [`GameError`] trait they all implement. Every error degrades
//! to a fallback, so none of them stop the host.

/// How a bestiary error is handled once it surfaces.
///
/// Nothing here halts the host; severity only picks the log level and tells a
/// reader whether the failure points at bad content or at a bug.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// A fallback (placeholder appearance, default strategy) took over.
    Recoverable,

    /// Content was malformed or conflicting and got overwritten or skipped.
    Validation,

    /// Runtime state went bad, e.g. a creature with NaN coordinates.
    Internal,
}

impl ErrorSeverity {
    /// Lowercase label used in log fields.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    pub const fn is_recoverable(self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Classification shared by every error enum in the workspace.
///
/// Implementors derive `thiserror::Error` for `Display` and map each variant
/// to a severity and a stable code.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this variant, used by logs and tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_internal_severity_flags_a_bug() {
        assert!(ErrorSeverity::Internal.is_internal());
        assert!(!ErrorSeverity::Validation.is_internal());
        assert!(ErrorSeverity::Recoverable.is_recoverable());
        assert_eq!(ErrorSeverity::Validation.label(), "validation");
    }
}
