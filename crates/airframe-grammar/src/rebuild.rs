//! Reconstruction of an assembly graph from parsed tokens.
//!
//! The graph is rebuilt by replaying connectors in ascending order of their
//! end joint's index. Edges that end at a joint another edge has already
//! created, and edges that end at the root, close cycles; they are replayed
//! after all other edges, in text order. An edge whose start joint has not
//! been grown yet is deferred to a later pass, and so is a cycle edge whose
//! end joint is still waiting for the edge that creates it.
//!
//! Newly grown joints are given the identity their edge token names and are
//! locked. Component and size are applied from the node tokens once all
//! geometry exists.

use std::collections::{BTreeMap, btree_map::Entry};

use indexmap::IndexMap;
use log::{debug, trace};

use airframe_core::{
    graph::{AssemblyGraph, GraphError},
    identifier::JointId,
    lattice::Direction,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::{Span, Spanned},
    tokens::{Configuration, EdgeToken, NodeToken},
};

/// Builds a fresh assembly graph from a parsed configuration.
///
/// # Errors
///
/// Returns a [`ParseError`] when the tokens do not describe a valid assembly:
/// a connector that is not a single lattice step (`E200`), two identities at
/// one position (`E201`), overlapping connectors (`E202`), an identity with no
/// node token or no joint (`E203`), a joint whose position disagrees with its
/// node token (`E204`), or a node token that no edge builds (`E205`).
pub fn rebuild(config: &Configuration) -> Result<AssemblyGraph, ParseError> {
    Rebuilder::new(config).build()
}

struct Rebuilder<'a> {
    config: &'a Configuration,
    nodes: IndexMap<JointId, &'a Spanned<NodeToken>>,
    graph: AssemblyGraph,
}

/// An edge in replay order.
#[derive(Clone, Copy)]
struct Step<'a> {
    edge: &'a Spanned<EdgeToken>,
    /// Ends at a joint some other edge creates.
    closes_cycle: bool,
}

impl<'a> Rebuilder<'a> {
    fn new(config: &'a Configuration) -> Self {
        let nodes = config
            .nodes()
            .iter()
            .map(|node| (node.identity, node))
            .collect();

        Self {
            config,
            nodes,
            graph: AssemblyGraph::new(),
        }
    }

    fn build(mut self) -> Result<AssemblyGraph, ParseError> {
        debug!(
            nodes = self.config.nodes().len(),
            edges = self.config.edges().len();
            "Rebuilding assembly graph"
        );

        let mut pending: Vec<_> = self.connection_steps().into_values().collect();
        self.graph.reset();
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for step in pending {
                let edge = step.edge;
                let waiting = self.graph.joint(edge.start).is_none()
                    || (step.closes_cycle && self.graph.joint(edge.end).is_none());
                if waiting {
                    trace!(start = edge.start.to_string(), end = edge.end.to_string(); "Deferring edge until its joints exist");
                    deferred.push(step);
                    continue;
                }
                self.replay(edge)?;
            }
            if deferred.len() == before {
                return Err(unreachable_start(deferred[0].edge).into());
            }
            pending = deferred;
        }
        self.apply_nodes()?;

        debug!(joints = self.graph.joints_count(), connectors = self.graph.connectors_count(); "Assembly graph rebuilt");
        Ok(self.graph)
    }

    /// Orders edges for replay, keyed by end index.
    ///
    /// The first edge ending at each index creates that joint. Later edges to
    /// the same index, and edges to the root, are re-keyed above the largest
    /// end index in the order they appear.
    fn connection_steps(&self) -> BTreeMap<usize, Step<'a>> {
        let mut steps = BTreeMap::new();
        let mut cycles = Vec::new();
        let mut watermark = 0;

        for edge in self.config.edges() {
            let index = edge.end.index();
            watermark = watermark.max(index);
            if edge.end == JointId::ROOT {
                cycles.push(edge);
                continue;
            }
            match steps.entry(index) {
                Entry::Vacant(slot) => {
                    slot.insert(Step {
                        edge,
                        closes_cycle: false,
                    });
                }
                Entry::Occupied(_) => cycles.push(edge),
            }
        }

        for edge in cycles {
            watermark += 1;
            steps.insert(
                watermark,
                Step {
                    edge,
                    closes_cycle: true,
                },
            );
        }
        steps
    }

    fn replay(&mut self, edge: &Spanned<EdgeToken>) -> Result<(), Diagnostic> {
        let span = edge.span();
        let start = self.node(edge.start, span)?;
        let end = self.node(edge.end, span)?;

        let direction = Direction::between(start.position, end.position).ok_or_else(|| {
            Diagnostic::error(format!(
                "edge `{}{}` connects {} to {}, which are not adjacent",
                edge.start, edge.end, start.position, end.position
            ))
            .at(ErrorCode::E200, span)
            .with_secondary_label(start.span(), "start joint declared here")
            .with_secondary_label(end.span(), "end joint declared here")
            .with_help("connectors join positions one lattice step apart along one axis")
        })?;

        let built_at = self
            .graph
            .joint(edge.start)
            .map(|joint| joint.position())
            .ok_or_else(|| unreachable_start(edge))?;
        if built_at != start.position {
            return Err(Diagnostic::error(format!(
                "joint `{}` was built at {} but is declared at {}",
                edge.start, built_at, start.position
            ))
            .at(ErrorCode::E204, span)
            .with_secondary_label(start.span(), "declared here"));
        }

        let connection = self
            .graph
            .connect(edge.start, direction)
            .map_err(|err| graph_diagnostic(err, span))?;
        let locked = self
            .graph
            .joint(connection.joint)
            .is_some_and(|joint| joint.is_locked());

        if !locked {
            self.graph
                .reassign_identity(connection.joint, edge.end)
                .map_err(|err| graph_diagnostic(err, span))?;
            self.graph
                .lock(edge.end)
                .map_err(|err| graph_diagnostic(err, span))?;
        } else if connection.joint != edge.end {
            return Err(Diagnostic::error(format!(
                "position {} is claimed by both `{}` and `{}`",
                end.position, connection.joint, edge.end
            ))
            .at(ErrorCode::E201, span)
            .with_secondary_label(end.span(), "declared here"));
        }
        Ok(())
    }

    /// Applies component and size from every node token.
    fn apply_nodes(&mut self) -> Result<(), ParseError> {
        let mut diagnostics = DiagnosticCollector::new();

        for node in self.config.nodes() {
            let built_at = self
                .graph
                .joint(node.identity)
                .map(|joint| joint.position());
            match built_at {
                None => diagnostics.emit(
                    Diagnostic::error(format!(
                        "joint `{}` is not connected to the assembly",
                        node.identity
                    ))
                    .at(ErrorCode::E205, node.span())
                    .with_help(format!(
                        "add an edge token ending at `{}`, or remove the node token",
                        node.identity
                    )),
                ),
                Some(position) if position != node.position => diagnostics.emit(
                    Diagnostic::error(format!(
                        "joint `{}` was built at {} but is declared at {}",
                        node.identity, position, node.position
                    ))
                    .at(ErrorCode::E204, node.span()),
                ),
                Some(_) => {
                    if let Err(err) =
                        self.graph
                            .configure_joint(node.identity, node.component, node.size)
                    {
                        diagnostics.emit(graph_diagnostic(err, node.span()));
                    }
                }
            }
        }

        diagnostics.finish().map(|_| ())
    }

    fn node(&self, identity: JointId, span: Span) -> Result<&'a Spanned<NodeToken>, Diagnostic> {
        self.nodes.get(&identity).copied().ok_or_else(|| {
            Diagnostic::error(format!("edge references unknown identity `{identity}`"))
                .with_code(ErrorCode::E203)
                .with_label(span, format!("no node token for `{identity}`"))
                .with_help("declare every joint with a `*` node token")
        })
    }
}

fn unreachable_start(edge: &Spanned<EdgeToken>) -> Diagnostic {
    Diagnostic::error(format!(
        "edge `{}{}` starts at `{}`, which is not connected to the assembly",
        edge.start, edge.end, edge.start
    ))
    .with_code(ErrorCode::E203)
    .with_label(edge.span(), "start joint is never built")
    .with_help("every joint must be reachable from the root `a`")
}

fn graph_diagnostic(err: GraphError, span: Span) -> Diagnostic {
    let code = match err {
        GraphError::InvalidDelta { .. } => ErrorCode::E200,
        GraphError::DuplicatePosition(_) => ErrorCode::E201,
        GraphError::DuplicateMidpoint { .. } => ErrorCode::E202,
        GraphError::UnknownJoint(_) | GraphError::UnknownConnector(_) => ErrorCode::E203,
        GraphError::IdentityInUse(_) => ErrorCode::E204,
        GraphError::IdentitiesExhausted | GraphError::RootJoint | GraphError::OutOfLattice(_) => {
            ErrorCode::E205
        }
    };
    Diagnostic::error(err.to_string())
        .at(code, span)
}

#[cfg(test)]
mod tests {
    use airframe_core::{component::ComponentType, lattice::Position};

    use super::*;
    use crate::codec::parse;

    fn build(text: &str) -> Result<AssemblyGraph, ParseError> {
        rebuild(&parse(text).unwrap())
    }

    fn first_code(err: &ParseError) -> Option<ErrorCode> {
        err.diagnostics()[0].code()
    }

    fn id(symbol: char) -> JointId {
        JointId::from_symbol(symbol).unwrap()
    }

    #[test]
    fn test_root_takes_node_token_component() {
        let graph = build("*aMM0+++++^ab*bNM4,5,3").unwrap();

        assert_eq!(graph.root().component(), ComponentType::Structure);
        assert_eq!(graph.root().size(), 5);
        assert!(graph.joints().all(|joint| joint.is_locked()));
    }

    #[test]
    fn test_identities_follow_edge_tokens() {
        // d is grown before any c exists and keeps its declared identity
        let graph = build("*aMM4*dNM4^ad,1,3").unwrap();

        assert_eq!(graph.joints_count(), 2);
        let d = graph.joint(id('d')).unwrap();
        assert_eq!(d.position(), Position::new(1, 0).unwrap());
        assert_eq!(graph.next_identity(), 4);
    }

    #[test]
    fn test_edges_replayed_by_end_index() {
        // ^bc appears before ^ab but is replayed after it
        let graph = build("*aMM4*bNM4*cNN4^bc^ab,1,3").unwrap();

        let endpoints: Vec<(char, char)> = graph
            .connectors()
            .map(|c| (c.start().symbol(), c.end().symbol()))
            .collect();
        assert_eq!(endpoints, vec![('a', 'b'), ('b', 'c')]);
    }

    #[test]
    fn test_edge_deferred_until_start_exists() {
        // b is only reachable through d, which has a higher index
        let graph = build("*aMM4*bNM4*cMN4*dNN4^ac^cd^db,1,3").unwrap();

        assert_eq!(graph.joints_count(), 4);
        let last = graph.connectors().last().unwrap();
        assert_eq!((last.start(), last.end()), (id('d'), id('b')));
        assert!(last.is_terminal());
    }

    #[test]
    fn test_cycle_edge_waits_for_creating_edge() {
        // ^db creates b but must wait for d; ^ab only closes the cycle
        let graph = build("*aMM4*bNM4*cMN4*dNN4^db^ac^cd^ab,1,3").unwrap();

        let into_b: Vec<(char, bool)> = graph
            .incoming(id('b'))
            .map(|c| (c.start().symbol(), c.is_terminal()))
            .collect();
        assert_eq!(into_b, vec![('d', true), ('a', false)]);
    }

    #[test]
    fn test_cycle_onto_root() {
        let graph = build("*aMM4*bNM4*cNN4*dMN4^ab^bc^cd^da,1,3").unwrap();

        assert_eq!(graph.joints_count(), 4);
        assert_eq!(graph.connectors_count(), 4);
        let closing = graph.connectors().last().unwrap();
        assert_eq!(closing.end(), JointId::ROOT);
        assert!(!closing.is_terminal());
    }

    #[test]
    fn test_invalid_delta() {
        let err = build("*aMM4*bNN4^ab,1,3").unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E200));
    }

    #[test]
    fn test_unknown_identity() {
        let err = build("*aMM4^ab,1,3").unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E203));
    }

    #[test]
    fn test_unreachable_start() {
        let err = build("*aMM4*bNM4*cOM4^bc,1,3").unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E203));
    }

    #[test]
    fn test_duplicate_position() {
        // d and e are both declared at NN; ^be arrives at the already locked d
        let err = build("*aMM4*bNM4*cMN4*dNN4*eNN4^ab^ac^cd^be,1,3").unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E201));
    }

    #[test]
    fn test_duplicate_edge_overlaps() {
        let err = build("*aMM4*bNM4^ab^ab,1,3").unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E202));
    }

    #[test]
    fn test_root_position_mismatch() {
        let err = build("*aNM4*bOM4^ab,1,3").unwrap_err();
        assert_eq!(first_code(&err), Some(ErrorCode::E204));
    }

    #[test]
    fn test_unbuilt_node_token() {
        let err = build("*aMM4*bNM4*cLM0^ab,1,3").unwrap_err();

        assert_eq!(first_code(&err), Some(ErrorCode::E205));
        assert_eq!(err.diagnostics().len(), 1);
    }
}
