//! The [`ParseError`] type wrapping the diagnostics of a failed decode.

use std::fmt;

use crate::error::{Diagnostic, ErrorCode};

/// A configuration string that failed to decode.
///
/// Holds every diagnostic of the failing pass in text order, at least one of
/// them rejecting the configuration.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Codes of the coded diagnostics, in text order.
    ///
    /// ```
    /// # use airframe_grammar::{parse, error::ErrorCode};
    /// let err = parse("*aXM0*bNM7,0,3").unwrap_err();
    /// let codes: Vec<ErrorCode> = err.codes().collect();
    /// assert_eq!(codes, [ErrorCode::E003, ErrorCode::E004, ErrorCode::E005]);
    /// ```
    pub fn codes(&self) -> impl Iterator<Item = ErrorCode> + '_ {
        self.diagnostics.iter().filter_map(Diagnostic::code)
    }
}

/// Shows the first diagnostic and the codes of the rest,
/// e.g. `error[E003]: ... (+2 more: E004, E005)`.
impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some((first, rest)) = self.diagnostics.split_first() else {
            return Ok(());
        };
        write!(f, "{first}")?;
        if rest.is_empty() {
            return Ok(());
        }
        write!(f, " (+{} more", rest.len())?;
        for (i, code) in rest.iter().filter_map(Diagnostic::code).enumerate() {
            f.write_str(if i == 0 { ": " } else { ", " })?;
            write!(f, "{code}")?;
        }
        f.write_str(")")
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_diagnostic() {
        let err: ParseError = Diagnostic::error("invalid capacity")
            .with_code(ErrorCode::E005)
            .into();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.to_string(), "error[E005]: invalid capacity");
    }

    #[test]
    fn test_display_lists_remaining_codes() {
        let err: ParseError = vec![
            Diagnostic::error("invalid lattice symbol").with_code(ErrorCode::E003),
            Diagnostic::error("invalid component digit").with_code(ErrorCode::E004),
            Diagnostic::error("unlabelled"),
            Diagnostic::error("invalid capacity").with_code(ErrorCode::E005),
        ]
        .into();

        assert_eq!(
            err.to_string(),
            "error[E003]: invalid lattice symbol (+3 more: E004, E005)"
        );
        assert_eq!(err.codes().count(), 3);
    }

    #[test]
    fn test_display_uncoded_rest() {
        let err: ParseError = vec![Diagnostic::error("first"), Diagnostic::error("second")].into();

        assert_eq!(err.to_string(), "error: first (+1 more)");
    }
}
