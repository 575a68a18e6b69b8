//! Severity levels for diagnostics.

use std::fmt;

/// Whether a diagnostic rejects the configuration it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// The configuration cannot be decoded.
    Error,
    /// Reported, but the configuration still decodes (`E101`, `E103`).
    Warning,
}

impl Severity {
    /// Returns `true` if a diagnostic of this severity rejects the configuration.
    pub fn rejects(self) -> bool {
        self == Severity::Error
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_errors_reject() {
        assert!(Severity::Error.rejects());
        assert!(!Severity::Warning.rejects());
        assert_eq!(Severity::Warning.to_string(), "warning");
    }
}
