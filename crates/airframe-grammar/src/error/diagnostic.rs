//! A single problem found in a configuration string.

use std::fmt;

use crate::{
    error::{Severity, error_code::ErrorCode, label::Label},
    span::Span,
};

/// An error or warning tied to tokens of the configuration text.
///
/// Rendered by the CLI as
///
/// ```text
/// error[E003]: invalid lattice symbol in node token
///   |
/// 1 | *aMQ0^ab,5,3
///   |  ^^^ expected one of `J K L M N O P`
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic that rejects the configuration.
    ///
    /// ```
    /// # use airframe_grammar::error::{Diagnostic, ErrorCode};
    /// # use airframe_grammar::Span;
    /// let diag = Diagnostic::error("edge references unknown identity `q`")
    ///     .at(ErrorCode::E203, Span::new(5..8));
    ///
    /// assert_eq!(diag.to_string(), "error[E203]: edge references unknown identity `q`");
    /// assert_eq!(diag.token_text("*aMM0^aq,5,3"), Some("^aq"));
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    /// Create a diagnostic that is reported without rejecting the configuration.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(message)
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The text of the offending token, taken from the first primary label.
    pub fn token_text<'s>(&self, source: &'s str) -> Option<&'s str> {
        self.labels
            .iter()
            .find(|label| label.is_primary())
            .and_then(|label| label.text(source))
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Set `code` and label `span` with the code's description.
    pub fn at(self, code: ErrorCode, span: Span) -> Self {
        self.with_code(code).with_label(span, code.description())
    }

    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.severity.as_str())?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_is_bare() {
        let diag = Diagnostic::warning("controller value is ignored");

        assert!(!diag.severity().rejects());
        assert!(diag.code().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
        assert_eq!(diag.to_string(), "warning: controller value is ignored");
    }

    #[test]
    fn test_duplicate_identity_labels() {
        let source = "*bNM1*bOM1^ab,2,3";
        let diag = Diagnostic::error("node identity `b` is defined multiple times")
            .with_code(ErrorCode::E102)
            .with_secondary_label(Span::new(0..5), "first defined here")
            .with_label(Span::new(5..10), "duplicate node token")
            .with_help("give every joint its own identity symbol");

        assert_eq!(diag.code(), Some(ErrorCode::E102));
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.token_text(source), Some("*bOM1"));
        assert_eq!(diag.help(), Some("give every joint its own identity symbol"));
    }

    #[test]
    fn test_at_labels_with_description() {
        let diag = Diagnostic::error("invalid capacity").at(ErrorCode::E005, Span::new(5..7));

        assert_eq!(diag.to_string(), "error[E005]: invalid capacity");
        assert_eq!(diag.labels()[0].message(), ErrorCode::E005.description());
        assert_eq!(diag.token_text("*aMM0,0,3"), Some(",0"));
    }
}
