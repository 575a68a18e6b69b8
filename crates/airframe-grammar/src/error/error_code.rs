//! Error codes for configuration diagnostics.
//!
//! Error codes are organized by phase:
//! - `E0xx` - Token errors
//! - `E1xx` - Configuration structure errors
//! - `E2xx` - Reconstruction errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Token Errors (E0xx)
    // =========================================================================
    /// Unexpected character.
    ///
    /// Every token starts with one of the markers `*`, `^` or `,`.
    E001,

    /// Invalid identity symbol.
    ///
    /// Joint identities are single letters, `a` to `z` then `A` to `Z`.
    E002,

    /// Invalid lattice symbol.
    ///
    /// Node positions are two characters from `J K L M N O P`.
    E003,

    /// Invalid component digit.
    ///
    /// The component digit must be one of `0` to `4`.
    E004,

    /// Invalid capacity.
    ///
    /// The capacity is a positive number, optionally with a fractional part
    /// that is truncated.
    E005,

    /// Invalid controller field.
    E006,

    // =========================================================================
    // Structure Errors (E1xx)
    // =========================================================================
    /// Incomplete configuration.
    ///
    /// The configuration ended before its `,capacity,controller` trailer.
    E100,

    /// Node token after an edge token.
    E101,

    /// Duplicate node identity.
    E102,

    /// Controller value ignored.
    E103,

    // =========================================================================
    // Reconstruction Errors (E2xx)
    // =========================================================================
    /// Invalid connector delta.
    ///
    /// Edge endpoints must be exactly one lattice unit apart along one axis.
    E200,

    /// Duplicate position.
    ///
    /// Two identities claim the same lattice position.
    E201,

    /// Duplicate midpoint.
    ///
    /// Two connectors would overlap.
    E202,

    /// Unknown identity.
    E203,

    /// Position mismatch.
    ///
    /// A joint was built at a different position from the one its node token declares.
    E204,

    /// Unbuilt joint.
    ///
    /// A node token names a joint that no edge creates.
    E205,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
            ErrorCode::E006 => "E006",
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E200 => "E200",
            ErrorCode::E201 => "E201",
            ErrorCode::E202 => "E202",
            ErrorCode::E203 => "E203",
            ErrorCode::E204 => "E204",
            ErrorCode::E205 => "E205",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E002 => "invalid identity symbol",
            ErrorCode::E003 => "invalid lattice symbol",
            ErrorCode::E004 => "invalid component digit",
            ErrorCode::E005 => "invalid capacity",
            ErrorCode::E006 => "invalid controller",
            ErrorCode::E100 => "incomplete configuration",
            ErrorCode::E101 => "node token after edge token",
            ErrorCode::E102 => "duplicate node identity",
            ErrorCode::E103 => "controller value ignored",
            ErrorCode::E200 => "invalid connector delta",
            ErrorCode::E201 => "duplicate position",
            ErrorCode::E202 => "duplicate midpoint",
            ErrorCode::E203 => "unknown identity",
            ErrorCode::E204 => "position mismatch",
            ErrorCode::E205 => "unbuilt joint",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
