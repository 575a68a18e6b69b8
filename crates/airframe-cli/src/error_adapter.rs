//! Rendering of [`AirframeError`] as miette reports.
//!
//! A rejected configuration carries one diagnostic per malformed token. Each
//! becomes its own [`Report`] so every token is underlined in the
//! configuration text, e.g.
//!
//! ```text
//!   × invalid lattice symbol in node token
//!    ╭────
//!  1 │ *aMQ0^ab,5,3
//!    · ──┬─
//!    ·   ╰── expected two of `J K L M N O P`
//!    ╰────
//! ```

use std::fmt;

use miette::{
    Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan,
    Severity as MietteSeverity, SourceSpan,
};

use airframe::AirframeError;
use airframe_grammar::error::{Diagnostic, ParseError, Severity};

/// One renderable report.
#[derive(Debug)]
pub enum Report<'a> {
    /// A token diagnostic shown against the configuration it was found in.
    Token { diag: &'a Diagnostic, src: &'a str },
    /// A session failure without a source location.
    Session(&'a AirframeError),
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Report::Token { diag, .. } => f.write_str(diag.message()),
            Report::Session(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Report<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Report::Token { .. } => None,
            Report::Session(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Report<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Report::Token { diag, .. } => diag
                .code()
                .map(|code| Box::new(code) as Box<dyn fmt::Display>),
            Report::Session(err) => {
                session_code(err).map(|code| Box::new(code) as Box<dyn fmt::Display>)
            }
        }
    }

    fn severity(&self) -> Option<MietteSeverity> {
        let Report::Token { diag, .. } = self else {
            return Some(MietteSeverity::Error);
        };
        Some(match diag.severity() {
            Severity::Error => MietteSeverity::Error,
            Severity::Warning => MietteSeverity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Report::Token { diag, .. } => diag
                .help()
                .map(|help| Box::new(help) as Box<dyn fmt::Display>),
            Report::Session(AirframeError::InvalidCapacity(_)) => {
                Some(Box::new("pass a whole number of at least 1, e.g. `5`") as Box<dyn fmt::Display>)
            }
            Report::Session(_) => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Report::Token { src, .. } => Some(src as &dyn miette::SourceCode),
            Report::Session(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Report::Token { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }

        Some(Box::new(diag.labels().iter().map(|label| {
            let span = SourceSpan::new(label.span().start().into(), label.span().len());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

fn session_code(err: &AirframeError) -> Option<&'static str> {
    match err {
        AirframeError::Io(_) => Some("airframe::io"),
        AirframeError::Edit(_) => Some("airframe::edit"),
        AirframeError::InvalidCapacity(_) => Some("airframe::capacity"),
        AirframeError::Parse { .. } | AirframeError::DefaultDesign { .. } => None,
    }
}

fn token_reports<'a>(err: &'a ParseError, src: &'a str) -> impl Iterator<Item = Report<'a>> {
    err.diagnostics()
        .iter()
        .map(move |diag| Report::Token { diag, src })
}

/// Splits an [`AirframeError`] into reports.
///
/// A rejected configuration yields one report per diagnostic. A failing
/// default design is introduced by a session report naming it.
pub fn to_reports(err: &AirframeError) -> Vec<Report<'_>> {
    match err {
        AirframeError::Parse { err: parse, src } => token_reports(parse, src).collect(),
        AirframeError::DefaultDesign { err: parse, src } => std::iter::once(Report::Session(err))
            .chain(token_reports(parse, src))
            .collect(),
        _ => vec![Report::Session(err)],
    }
}

/// Renders every report of `err` with `handler`.
///
/// A report the handler fails to render falls back to its plain message.
pub fn render_reports(err: &AirframeError, handler: &GraphicalReportHandler) -> Vec<String> {
    to_reports(err)
        .iter()
        .map(|report| {
            let mut out = String::new();
            match handler.render_report(&mut out, report) {
                Ok(()) => out,
                Err(_) => report.to_string(),
            }
        })
        .collect()
}
