//! Error and diagnostic system for the configuration grammar.
//!
//! Parsing and reconstruction report problems as [`Diagnostic`]s: a severity,
//! an [`ErrorCode`], labeled source spans, and optional help text. All
//! diagnostics produced by one pass are wrapped in a [`ParseError`], so a
//! single decode reports every malformed token rather than only the first.
//!
//! # Example
//!
//! ```
//! # use airframe_grammar::error::{Diagnostic, ErrorCode};
//! # use airframe_grammar::Span;
//!
//! let diag = Diagnostic::error("node identity `b` is defined multiple times")
//!     .with_code(ErrorCode::E102)
//!     .with_label(Span::new(9..18), "duplicate node token")
//!     .with_secondary_label(Span::new(0..9), "first defined here")
//!     .with_help("give every joint its own identity symbol");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
