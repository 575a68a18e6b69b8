//! Token types of a parsed configuration.
//!
//! ```text
//! *aMM0+++++*bNM2+++*cMN1+++*dLM2+++*eML1+++^ab^ac^ad^ae,5,3
//! └── node ──┘└─ node ─┘ ...                 └edge┘ ...  └trailer┘
//! ```

use airframe_core::{component::ComponentType, identifier::JointId, lattice::Position};

use crate::{error::Diagnostic, span::Spanned};

/// The controller index written by the serializer.
pub const CONTROLLER: u32 = 3;

/// `*` identity, two lattice symbols, a component digit, then one `+` per size increment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeToken {
    pub identity: JointId,
    pub position: Position,
    pub component: ComponentType,
    pub size: u32,
}

/// `^` start identity then end identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeToken {
    pub start: JointId,
    pub end: JointId,
}

/// `,capacity,controller`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trailer {
    pub capacity: u32,
    pub controller: u32,
}

/// A syntactically valid configuration, before any geometry is checked.
#[derive(Debug, Clone)]
pub struct Configuration {
    pub(crate) nodes: Vec<Spanned<NodeToken>>,
    pub(crate) edges: Vec<Spanned<EdgeToken>>,
    pub(crate) trailer: Spanned<Trailer>,
    pub(crate) warnings: Vec<Diagnostic>,
}

impl Configuration {
    /// Node tokens in text order.
    pub fn nodes(&self) -> &[Spanned<NodeToken>] {
        &self.nodes
    }

    /// Edge tokens in text order.
    pub fn edges(&self) -> &[Spanned<EdgeToken>] {
        &self.edges
    }

    pub fn trailer(&self) -> &Spanned<Trailer> {
        &self.trailer
    }

    pub fn capacity(&self) -> u32 {
        self.trailer.capacity
    }

    /// Non-fatal diagnostics produced while parsing.
    pub fn warnings(&self) -> &[Diagnostic] {
        &self.warnings
    }
}
