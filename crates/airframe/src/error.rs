//! Error types for Airframe design sessions.
//!
//! This module provides the main error type [`AirframeError`] which wraps
//! the error conditions of a session: decoding, editing and file access.

use std::io;

use thiserror::Error;

use airframe_core::edit::EditError;
use airframe_grammar::ParseError;

/// The main error type for Airframe operations.
///
/// # Diagnostic Variants
///
/// The `Parse` and `DefaultDesign` variants carry the source text next to the
/// structured diagnostics so a front end can render labelled reports.
#[derive(Debug, Error)]
pub enum AirframeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    /// The configured default design does not decode. Nothing can be loaded.
    #[error("default design is invalid: {err}")]
    DefaultDesign { err: ParseError, src: String },

    #[error("{0}")]
    Edit(#[from] EditError),

    #[error("invalid capacity `{0}`: expected a positive whole number")]
    InvalidCapacity(String),
}

impl AirframeError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }

    /// Create a new `DefaultDesign` error with the associated source text.
    pub fn new_default_design_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::DefaultDesign {
            err,
            src: src.into(),
        }
    }
}
