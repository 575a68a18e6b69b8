//! Tokenizer and parser for configuration strings.
//!
//! The grammar is a flat, whitespace-free sequence of marker-led tokens:
//!
//! ```text
//! configuration := node* edge* "," capacity "," controller
//! node          := "*" ident lattice lattice digit "+"*
//! edge          := "^" ident ident
//! capacity      := digits ( "." digits )?
//! controller    := digits
//! ```
//!
//! The public entry point is [`parse`], which recovers from malformed tokens
//! by skipping to the next marker so every problem is reported in one pass.

use indexmap::IndexMap;
use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{cut_err, opt, preceded},
    error::{ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, take_till, take_while},
};

use airframe_core::{component::ComponentType, identifier::JointId, lattice::Position};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::{Span, Spanned},
    tokens::{CONTROLLER, Configuration, EdgeToken, NodeToken, Trailer},
};

/// Characters that start a token.
const MARKERS: [char; 3] = ['*', '^', ','];

/// Rich diagnostic information attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenDiagnostic {
    code: ErrorCode,
    message: &'static str,
    label: &'static str,
    help: Option<&'static str>,
    /// Start of the token being parsed.
    start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<O> = ModalResult<O, ContextError<TokenDiagnostic>>;

fn identity(input: &mut Input<'_>) -> IResult<JointId> {
    any.verify_map(JointId::from_symbol).parse_next(input)
}

fn position(input: &mut Input<'_>) -> IResult<Position> {
    (any, any)
        .verify_map(|(x, z): (char, char)| Position::from_symbols(x, z).ok())
        .parse_next(input)
}

fn component(input: &mut Input<'_>) -> IResult<ComponentType> {
    any.verify_map(ComponentType::from_digit).parse_next(input)
}

/// Parse a capacity, truncating any fractional part.
fn capacity(input: &mut Input<'_>) -> IResult<u32> {
    (digit1, opt(preceded('.', digit1)))
        .try_map(|(whole, _fraction): (&str, Option<&str>)| whole.parse::<u32>())
        .verify(|capacity: &u32| *capacity >= 1)
        .parse_next(input)
}

fn controller(input: &mut Input<'_>) -> IResult<u32> {
    digit1
        .try_map(|digits: &str| digits.parse::<u32>())
        .parse_next(input)
}

/// Parse a node token: `*aMM0+++`.
fn node_token(input: &mut Input<'_>) -> IResult<NodeToken> {
    let start = input.current_token_start();
    '*'.parse_next(input)?;

    let identity = cut_err(identity)
        .context(TokenDiagnostic {
            code: ErrorCode::E002,
            message: "invalid identity symbol in node token",
            label: "expected a letter after `*`",
            help: Some("identities are `a` to `z`, then `A` to `Z`"),
            start,
        })
        .parse_next(input)?;
    let position = cut_err(position)
        .context(TokenDiagnostic {
            code: ErrorCode::E003,
            message: "invalid lattice symbol in node token",
            label: "expected two of `J K L M N O P`",
            help: Some("`M` is the centre of each axis, `J` is -3 and `P` is +3"),
            start,
        })
        .parse_next(input)?;
    let component = cut_err(component)
        .context(TokenDiagnostic {
            code: ErrorCode::E004,
            message: "invalid component digit in node token",
            label: "expected a digit from `0` to `4`",
            help: Some("0 structure, 1 CW motor, 2 CCW motor, 3 foil, 4 none"),
            start,
        })
        .parse_next(input)?;
    let size = take_while(0.., '+')
        .map(|pluses: &str| pluses.len() as u32)
        .parse_next(input)?;

    Ok(NodeToken {
        identity,
        position,
        component,
        size,
    })
}

/// Parse an edge token: `^ab`.
fn edge_token(input: &mut Input<'_>) -> IResult<EdgeToken> {
    let start = input.current_token_start();
    '^'.parse_next(input)?;

    let (start_id, end_id) = cut_err((identity, identity))
        .context(TokenDiagnostic {
            code: ErrorCode::E002,
            message: "invalid identity symbol in edge token",
            label: "expected two letters after `^`",
            help: Some("an edge names its start joint, then its end joint"),
            start,
        })
        .parse_next(input)?;

    Ok(EdgeToken {
        start: start_id,
        end: end_id,
    })
}

/// Parse the trailer: `,5,3`.
fn trailer(input: &mut Input<'_>) -> IResult<Trailer> {
    let start = input.current_token_start();
    ','.parse_next(input)?;

    let capacity = cut_err(capacity)
        .context(TokenDiagnostic {
            code: ErrorCode::E005,
            message: "invalid capacity",
            label: "expected a positive number",
            help: Some("capacity is at least 1, for example `,5,3`"),
            start,
        })
        .parse_next(input)?;
    let controller = cut_err(preceded(',', controller))
        .context(TokenDiagnostic {
            code: ErrorCode::E006,
            message: "invalid controller field",
            label: "expected `,` followed by digits",
            help: Some("the configuration ends with `,<capacity>,3`"),
            start,
        })
        .parse_next(input)?;

    Ok(Trailer {
        capacity,
        controller,
    })
}

fn skip_to_marker(input: &mut Input<'_>) -> IResult<()> {
    take_till(0.., MARKERS).void().parse_next(input)
}

/// Parser that accumulates tokens and diagnostics.
struct Parser<'a> {
    source: &'a str,
    nodes: Vec<Spanned<NodeToken>>,
    edges: Vec<Spanned<EdgeToken>>,
    trailer: Option<Spanned<Trailer>>,
    trailer_seen: bool,
    identities: IndexMap<JointId, Span>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            nodes: Vec::new(),
            edges: Vec::new(),
            trailer: None,
            trailer_seen: false,
            identities: IndexMap::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    fn run(&mut self, mut input: Input<'a>) {
        while let Some(next) = input.chars().next() {
            let start = input.current_token_start();
            let checkpoint = input.checkpoint();

            match next {
                '*' => match node_token(&mut input) {
                    Ok(node) => {
                        let span = Span::new(start..input.current_token_start());
                        self.push_node(node, span);
                    }
                    Err(err) => self.recover(err, &mut input, &checkpoint),
                },
                '^' => match edge_token(&mut input) {
                    Ok(edge) => {
                        let span = Span::new(start..input.current_token_start());
                        self.edges.push(Spanned::new(edge, span));
                    }
                    Err(err) => self.recover(err, &mut input, &checkpoint),
                },
                ',' => {
                    self.trailer_seen = true;
                    match trailer(&mut input) {
                        Ok(trailer) => {
                            let span = Span::new(start..input.current_token_start());
                            self.push_trailer(trailer, span);
                            self.check_trailing(&input);
                        }
                        Err(err) => {
                            let error_pos = input.current_token_start();
                            self.emit_err(err, error_pos);
                        }
                    }
                    // Nothing may follow the trailer.
                    break;
                }
                other => {
                    let span = Span::new(start..start + other.len_utf8());
                    self.diagnostics.emit(
                        Diagnostic::error(format!("unexpected character `{other}`"))
                            .at(ErrorCode::E001, span)
                            .with_help("tokens start with `*` (node), `^` (edge) or `,` (trailer)"),
                    );
                    input.next_token();
                    let _ = skip_to_marker(&mut input);
                }
            }
        }
    }

    fn push_node(&mut self, node: NodeToken, span: Span) {
        if let Some(first) = self.identities.get(&node.identity) {
            self.diagnostics.emit(
                Diagnostic::error(format!(
                    "node identity `{}` is defined multiple times",
                    node.identity
                ))
                .with_code(ErrorCode::E102)
                .with_label(span, "duplicate node token")
                .with_secondary_label(*first, "first defined here")
                .with_help("give every joint its own identity symbol"),
            );
            return;
        }
        if let Some(edge) = self.edges.first() {
            self.diagnostics.emit(
                Diagnostic::warning("node token after edge tokens")
                    .with_code(ErrorCode::E101)
                    .with_label(span, "node token")
                    .with_secondary_label(edge.span(), "first edge token")
                    .with_help("write every node token before the first `^`"),
            );
        }

        self.identities.insert(node.identity, span);
        self.nodes.push(Spanned::new(node, span));
    }

    fn push_trailer(&mut self, trailer: Trailer, span: Span) {
        if trailer.controller != CONTROLLER {
            self.diagnostics.emit(
                Diagnostic::warning(format!(
                    "controller value `{}` is ignored",
                    trailer.controller
                ))
                .at(ErrorCode::E103, span)
                .with_help(format!("the controller is always written as `{CONTROLLER}`")),
            );
        }
        self.trailer = Some(Spanned::new(trailer, span));
    }

    fn check_trailing(&mut self, input: &Input<'a>) {
        if input.is_empty() {
            return;
        }
        let start = input.current_token_start();
        self.diagnostics.emit(
            Diagnostic::error("unexpected input after the controller field")
                .with_code(ErrorCode::E001)
                .with_label(Span::new(start..self.source.len()), "trailing input")
                .with_help("the trailer `,<capacity>,<controller>` ends the configuration"),
        );
    }

    /// Emit the error and skip to the next token marker.
    fn recover(
        &mut self,
        err: ErrMode<ContextError<TokenDiagnostic>>,
        input: &mut Input<'a>,
        checkpoint: &<Input<'a> as Stream>::Checkpoint,
    ) {
        let error_pos = input.current_token_start();
        self.emit_err(err, error_pos);

        input.reset(checkpoint);
        input.next_token();
        let _ = skip_to_marker(input);
    }

    /// Convert an ErrMode into a diagnostic.
    ///
    /// The span runs from the token start through the offending character.
    fn emit_err(&mut self, err: ErrMode<ContextError<TokenDiagnostic>>, error_pos: usize) {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };
        let end = (error_pos + 1).min(self.source.len());

        let diagnostic = match context_error.context().next() {
            Some(TokenDiagnostic {
                code,
                message,
                label,
                help,
                start,
            }) => {
                let mut diag = Diagnostic::error(*message)
                    .with_code(*code)
                    .with_label(Span::new(*start..end), *label);
                if let Some(help) = help {
                    diag = diag.with_help(*help);
                }
                diag
            }
            None => Diagnostic::error("unexpected character")
                .at(ErrorCode::E001, Span::new(error_pos..end)),
        };
        self.diagnostics.emit(diagnostic);
    }

    fn finish(mut self) -> Result<Configuration, ParseError> {
        if !self.trailer_seen {
            let end = self.source.len();
            self.diagnostics.emit(
                Diagnostic::error("configuration ends without its trailer")
                    .with_code(ErrorCode::E100)
                    .with_label(Span::new(end..end), "expected `,<capacity>,<controller>`")
                    .with_help("end the configuration with the capacity and controller, e.g. `,5,3`"),
            );
        }

        let warnings = self.diagnostics.finish()?;
        match self.trailer {
            Some(trailer) => Ok(Configuration {
                nodes: self.nodes,
                edges: self.edges,
                trailer,
                warnings,
            }),
            None => Err(ParseError::new(warnings)),
        }
    }
}

/// Parse a configuration string into its tokens.
///
/// Syntax is checked here; geometry is checked by [`crate::rebuild`].
///
/// # Errors
///
/// Returns a [`ParseError`] carrying one diagnostic per malformed token, per
/// duplicated node identity, and for a missing or malformed trailer.
pub fn parse(source: &str) -> Result<Configuration, ParseError> {
    let mut parser = Parser::new(source);
    parser.run(LocatingSlice::new(source));
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codes(err: &ParseError) -> Vec<ErrorCode> {
        err.codes().collect()
    }

    #[test]
    fn test_node_token() {
        let mut input = LocatingSlice::new("*bNL2+++");
        let node = node_token(&mut input).unwrap();

        assert_eq!(node.identity.symbol(), 'b');
        assert_eq!(node.position, Position::new(1, -1).unwrap());
        assert_eq!(node.component, ComponentType::MotorCCW);
        assert_eq!(node.size, 3);
    }

    #[test]
    fn test_node_token_without_size() {
        let mut input = LocatingSlice::new("*ZJP4");
        let node = node_token(&mut input).unwrap();

        assert_eq!(node.identity.index(), 51);
        assert_eq!(node.component, ComponentType::None);
        assert_eq!(node.size, 0);
    }

    #[test]
    fn test_edge_token() {
        let mut input = LocatingSlice::new("^aB");
        let edge = edge_token(&mut input).unwrap();

        assert_eq!(edge.start, JointId::ROOT);
        assert_eq!(edge.end.index(), 27);
    }

    #[test]
    fn test_capacity_truncates_fraction() {
        let mut input = LocatingSlice::new(",12.9,3");
        let trailer = trailer(&mut input).unwrap();

        assert_eq!(trailer.capacity, 12);
        assert_eq!(trailer.controller, 3);
    }

    #[test]
    fn test_parse_default_configuration() {
        let config = parse("*aMM0+++++*bNM2+++*cMN1+++*dLM2+++*eML1+++^ab^ac^ad^ae,5,3").unwrap();

        assert_eq!(config.nodes().len(), 5);
        assert_eq!(config.edges().len(), 4);
        assert_eq!(config.capacity(), 5);
        assert!(config.warnings().is_empty());
        assert_eq!(config.nodes()[1].span(), Span::new(10..18));
        assert_eq!(config.edges()[0].span(), Span::new(42..45));
    }

    #[test]
    fn test_parse_invalid_lattice_symbol() {
        let err = parse("*aMQ0,5,3").unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E003]);
        let label = &err.diagnostics()[0].labels()[0];
        assert_eq!(label.span().start(), 0);
    }

    #[test]
    fn test_parse_reports_every_bad_token() {
        let err = parse("*aMM9*bNM0^a?^ab,5,3").unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E004, ErrorCode::E002]);
    }

    #[test]
    fn test_parse_unexpected_character() {
        let err = parse("*aMM0 ^ab,5,3").unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E001]);
        assert_eq!(err.diagnostics()[0].labels()[0].span(), Span::new(5..6));
    }

    #[test]
    fn test_parse_missing_trailer() {
        let err = parse("*aMM0").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E100]);

        let err = parse("").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E100]);
    }

    #[test]
    fn test_parse_zero_capacity() {
        let err = parse("*aMM0,0,3").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E005]);
    }

    #[test]
    fn test_parse_missing_controller() {
        let err = parse("*aMM0,5").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E006]);
    }

    #[test]
    fn test_parse_trailing_input() {
        let err = parse("*aMM0,5,3*bNM0").unwrap_err();
        assert_eq!(codes(&err), vec![ErrorCode::E001]);
    }

    #[test]
    fn test_parse_duplicate_identity() {
        let err = parse("*aMM0*bNM0*bMN0^ab,5,3").unwrap_err();

        assert_eq!(codes(&err), vec![ErrorCode::E102]);
        let labels = err.diagnostics()[0].labels();
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[1].span(), Span::new(5..10));
    }

    #[test]
    fn test_parse_warnings() {
        let config = parse("*aMM0^ab*bNM0,5,7").unwrap();

        let warnings: Vec<ErrorCode> = config.warnings().iter().filter_map(|d| d.code()).collect();
        assert_eq!(warnings, vec![ErrorCode::E101, ErrorCode::E103]);
        assert_eq!(config.trailer().controller, 7);
    }
}
