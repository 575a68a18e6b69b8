//! Labeled spans of configuration text.

use crate::span::Span;

/// A message attached to a span of the configuration text.
///
/// Primary labels mark the offending token; secondary labels point at related
/// tokens, such as the first definition of a duplicated identity.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
    is_primary: bool,
}

impl Label {
    pub fn primary(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message, true)
    }

    pub fn secondary(span: Span, message: impl Into<String>) -> Self {
        Self::new(span, message, false)
    }

    fn new(span: Span, message: impl Into<String>, is_primary: bool) -> Self {
        Self {
            span,
            message: message.into(),
            is_primary,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Returns the labelled text of `source`, or `None` when the span does
    /// not fall inside it.
    ///
    /// ```
    /// # use airframe_grammar::{Span, error::Label};
    /// let label = Label::primary(Span::new(5..10), "duplicate node token");
    /// assert_eq!(label.text("*bNM1*bOM1^ab,2,3"), Some("*bOM1"));
    /// ```
    pub fn text<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.span.start()..self.span.end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_label() {
        let label = Label::primary(Span::new(4..9), "malformed node token");

        assert_eq!(label.span(), Span::new(4..9));
        assert_eq!(label.message(), "malformed node token");
        assert!(label.is_primary());
    }

    #[test]
    fn test_secondary_label() {
        let label = Label::secondary(Span::new(0..5), "first defined here");

        assert!(!label.is_primary());
        assert_eq!(label.text("*bNM1*bOM1^ab,2,3"), Some("*bNM1"));
    }

    #[test]
    fn test_text_outside_source() {
        let label = Label::primary(Span::new(8..12), "edge token");

        assert_eq!(label.text("*aMM0"), None);
    }
}
