//! # Airframe Grammar
//!
//! Parser, reconstructor and serializer for the Airframe vehicle
//! configuration grammar.
//!
//! ## Usage
//!
//! ```
//! # use airframe_grammar::{decode, encode, ParseError};
//!
//! fn main() -> Result<(), ParseError> {
//!     let text = "*aMM0+++++*bNM2+++*cMN1+++*dLM2+++*eML1+++^ab^ac^ad^ae,5,3";
//!
//!     let decoded = decode(text)?;
//!     assert_eq!(decoded.graph.joints_count(), 5);
//!     assert_eq!(encode(&decoded.graph, decoded.capacity), text);
//!     Ok(())
//! }
//! ```

mod codec;
pub mod error;
mod rebuild;
mod span;
mod tokens;
mod writer;

pub use codec::parse;
pub use error::{Diagnostic, ParseError};
pub use rebuild::rebuild;
pub use span::{Span, Spanned};
pub use tokens::{CONTROLLER, Configuration, EdgeToken, NodeToken, Trailer};
pub use writer::encode;

use log::debug;

use airframe_core::graph::AssemblyGraph;

/// A configuration string turned back into a graph.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub graph: AssemblyGraph,
    pub capacity: u32,
    /// Non-fatal diagnostics from parsing.
    pub warnings: Vec<Diagnostic>,
}

/// Decode configuration text into a fresh assembly graph.
///
/// 1. **Parse** - Tokenize and check syntax, collecting every malformed token
/// 2. **Rebuild** - Replay the edges on a new graph and apply the node tokens
///
/// # Errors
///
/// Returns a [`ParseError`] with diagnostics from whichever step failed.
pub fn decode(text: &str) -> Result<Decoded, ParseError> {
    let config = parse(text)?;
    let graph = rebuild(&config)?;

    debug!(joints = graph.joints_count(), capacity = config.capacity(); "Decoded configuration");
    Ok(Decoded {
        graph,
        capacity: config.capacity(),
        warnings: config.warnings,
    })
}
