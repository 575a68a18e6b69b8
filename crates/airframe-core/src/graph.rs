//! Assembly graph model.
//!
//! An [`AssemblyGraph`] holds the joints and connectors of one vehicle design.
//! Joints live in an arena (`Vec<Joint>`) and connectors refer to them by
//! [`JointId`], so cyclic assemblies never produce pointer cycles.
//!
//! # Invariants
//!
//! 1. Exactly one joint, the root, has no incoming connector.
//! 2. Every joint is reachable from the root along connectors.
//! 3. After [`AssemblyGraph::compact_indices`], joint identities are exactly `0..N`.
//! 4. No two joints share a lattice position, and no two connectors share a midpoint.
//!
//! Operations that would violate an invariant fail with a [`GraphError`] and
//! leave the graph untouched.

use log::{debug, trace};
use petgraph::{graphmap::DiGraphMap, visit::Bfs};
use thiserror::Error;

use crate::{
    component::ComponentType,
    identifier::{ConnectorId, JointId},
    lattice::{Direction, LatticeError, Midpoint, Position},
};

/// Errors raised by assembly graph operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("a joint already occupies position {0}")]
    DuplicatePosition(Position),

    #[error("a connector already occupies the midpoint between {start} and {end}")]
    DuplicateMidpoint { start: Position, end: Position },

    #[error("{start} and {end} are not one lattice unit apart along a single axis")]
    InvalidDelta { start: Position, end: Position },

    #[error("joint `{0}` does not exist")]
    UnknownJoint(JointId),

    #[error("connector {0} does not exist")]
    UnknownConnector(ConnectorId),

    #[error("joint identity `{0}` is already in use")]
    IdentityInUse(JointId),

    #[error("all joint identities are in use")]
    IdentitiesExhausted,

    #[error("the root joint cannot be removed")]
    RootJoint,

    #[error(transparent)]
    OutOfLattice(#[from] LatticeError),
}

/// A structural joint: a lattice position with an optional component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Joint {
    id: JointId,
    position: Position,
    component: ComponentType,
    size: u32,
    locked: bool,
}

impl Joint {
    fn new(id: JointId, position: Position) -> Self {
        Self {
            id,
            position,
            component: ComponentType::None,
            size: 0,
            locked: false,
        }
    }

    pub fn id(&self) -> JointId {
        self.id
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn component(&self) -> ComponentType {
        self.component
    }

    /// Returns the number of size increments applied to the component.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns `true` once the joint's identity has been reconciled during
    /// reconstruction.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub(crate) fn set_component(&mut self, component: ComponentType) {
        self.component = component;
    }

    pub(crate) fn set_size(&mut self, size: u32) {
        self.size = size;
    }
}

/// A connector between two joints one lattice unit apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connector {
    id: ConnectorId,
    start: JointId,
    end: JointId,
    terminal: bool,
}

impl Connector {
    pub fn id(&self) -> ConnectorId {
        self.id
    }

    pub fn start(&self) -> JointId {
        self.start
    }

    pub fn end(&self) -> JointId {
        self.end
    }

    /// Returns `true` if this connector created its end joint, `false` if it
    /// closed a cycle onto a joint that already existed.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// Outcome of [`AssemblyGraph::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Connection {
    pub connector: ConnectorId,
    pub joint: JointId,
    pub terminal: bool,
}

/// A directional growth handle on a joint.
///
/// A handle is open when its target is addressable and no connector already
/// occupies the midpoint towards it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    pub direction: Direction,
    pub target: Option<Position>,
    pub open: bool,
}

/// The joints and connectors of one vehicle design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssemblyGraph {
    joints: Vec<Joint>,
    connectors: Vec<Connector>,
    /// Next sequential joint identity.
    next_joint: usize,
    next_connector: u32,
}

impl Default for AssemblyGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl AssemblyGraph {
    /// Creates a graph holding only the root joint.
    pub fn new() -> Self {
        let mut root = Joint::new(JointId::ROOT, Position::ORIGIN);
        root.locked = true;

        Self {
            joints: vec![root],
            connectors: Vec::new(),
            next_joint: 1,
            next_connector: 0,
        }
    }

    /// Resets the graph to the root joint and restarts identity assignment.
    pub fn reset(&mut self) {
        *self = Self::new();
        trace!("Assembly graph reset to root");
    }

    /// Returns the root joint.
    pub fn root(&self) -> &Joint {
        // The root is never removed and compaction keeps it at identity 0.
        &self.joints[self.index_of(JointId::ROOT).unwrap_or(0)]
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.joints.iter().find(|joint| joint.id == id)
    }

    pub(crate) fn joint_mut(&mut self, id: JointId) -> Result<&mut Joint, GraphError> {
        self.joints
            .iter_mut()
            .find(|joint| joint.id == id)
            .ok_or(GraphError::UnknownJoint(id))
    }

    /// Returns the joints in arena order.
    pub fn joints(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }

    pub fn joints_count(&self) -> usize {
        self.joints.len()
    }

    pub fn joint_at(&self, position: Position) -> Option<&Joint> {
        self.joints.iter().find(|joint| joint.position == position)
    }

    pub fn connector(&self, id: ConnectorId) -> Option<&Connector> {
        self.connectors.iter().find(|connector| connector.id == id)
    }

    /// Returns the connectors in creation order.
    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.connectors.iter()
    }

    pub fn connectors_count(&self) -> usize {
        self.connectors.len()
    }

    /// Returns the connector occupying the midpoint between two positions.
    pub fn connector_at(&self, a: Position, b: Position) -> Option<&Connector> {
        let midpoint = Midpoint::between(a, b);
        self.connectors
            .iter()
            .find(|connector| self.midpoint_of(connector) == Some(midpoint))
    }

    /// Returns connectors whose end is `id`.
    pub fn incoming(&self, id: JointId) -> impl Iterator<Item = &Connector> {
        self.connectors.iter().filter(move |c| c.end == id)
    }

    /// Returns connectors whose start is `id`.
    pub fn outgoing(&self, id: JointId) -> impl Iterator<Item = &Connector> {
        self.connectors.iter().filter(move |c| c.start == id)
    }

    /// Returns the identity the next created joint will receive.
    pub fn next_identity(&self) -> usize {
        self.next_joint
    }

    /// Creates an unconnected joint at `position`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicatePosition`] if another joint occupies `position`.
    /// - [`GraphError::IdentitiesExhausted`] if no identity symbol is left.
    pub fn create_joint(&mut self, position: Position) -> Result<JointId, GraphError> {
        if self.joint_at(position).is_some() {
            return Err(GraphError::DuplicatePosition(position));
        }
        let id = JointId::new(self.next_joint).ok_or(GraphError::IdentitiesExhausted)?;
        if self.joint(id).is_some() {
            return Err(GraphError::IdentityInUse(id));
        }

        self.joints.push(Joint::new(id, position));
        self.next_joint += 1;

        debug!(joint = id.to_string(), position = position.to_string(); "Created joint");
        Ok(id)
    }

    /// Connects two existing joints without creating any joint.
    ///
    /// The connector is classified as non-terminal.
    ///
    /// # Errors
    ///
    /// - [`GraphError::UnknownJoint`] if either endpoint is missing.
    /// - [`GraphError::InvalidDelta`] unless the endpoints are one unit apart on one axis.
    /// - [`GraphError::DuplicateMidpoint`] if a connector already spans that midpoint.
    pub fn create_connector(
        &mut self,
        start: JointId,
        end: JointId,
    ) -> Result<ConnectorId, GraphError> {
        let start_position = self.position_of(start)?;
        let end_position = self.position_of(end)?;
        if Direction::between(start_position, end_position).is_none() {
            return Err(GraphError::InvalidDelta {
                start: start_position,
                end: end_position,
            });
        }
        self.ensure_midpoint_free(start_position, end_position)?;

        Ok(self.insert_connector(start, end, false))
    }

    /// Grows a connector from `start` one unit in `direction`.
    ///
    /// When the target position is empty a new joint is created there and the
    /// connector is terminal; otherwise the connector closes a cycle onto the
    /// joint already at the target.
    ///
    /// # Errors
    ///
    /// - [`GraphError::UnknownJoint`] if `start` is missing.
    /// - [`GraphError::OutOfLattice`] if the target is not addressable.
    /// - [`GraphError::DuplicateMidpoint`] if the handle is already used.
    /// - [`GraphError::IdentitiesExhausted`] if a new joint is needed but no identity is left.
    pub fn connect(
        &mut self,
        start: JointId,
        direction: Direction,
    ) -> Result<Connection, GraphError> {
        let start_position = self.position_of(start)?;
        let target = start_position.step(direction)?;
        self.ensure_midpoint_free(start_position, target)?;

        let (joint, terminal) = match self.joint_at(target) {
            Some(existing) => (existing.id, false),
            None => (self.create_joint(target)?, true),
        };
        let connector = self.insert_connector(start, joint, terminal);

        Ok(Connection {
            connector,
            joint,
            terminal,
        })
    }

    /// Removes a connector and returns it. Joints are left in place.
    pub fn remove_connector(&mut self, id: ConnectorId) -> Result<Connector, GraphError> {
        let index = self
            .connectors
            .iter()
            .position(|connector| connector.id == id)
            .ok_or(GraphError::UnknownConnector(id))?;
        let removed = self.connectors.remove(index);

        debug!(connector = id.value(), start = removed.start.to_string(), end = removed.end.to_string(); "Removed connector");
        Ok(removed)
    }

    /// Removes a joint together with every connector touching it.
    ///
    /// # Errors
    ///
    /// - [`GraphError::RootJoint`] for the root.
    /// - [`GraphError::UnknownJoint`] if the joint is missing.
    pub fn remove_joint(&mut self, id: JointId) -> Result<Joint, GraphError> {
        if id == JointId::ROOT {
            return Err(GraphError::RootJoint);
        }
        let index = self.index_of(id).ok_or(GraphError::UnknownJoint(id))?;
        let removed = self.joints.remove(index);
        self.connectors
            .retain(|connector| connector.start != id && connector.end != id);

        debug!(joint = id.to_string(); "Removed joint");
        Ok(removed)
    }

    /// Renumbers joints densely in ascending order of their current identity
    /// and remaps every connector endpoint.
    pub fn compact_indices(&mut self) {
        self.joints.sort_by_key(|joint| joint.id);

        let mut changes = Vec::new();
        for (index, joint) in self.joints.iter_mut().enumerate() {
            // Dense indices never exceed the identities already in use.
            let Some(dense) = JointId::new(index) else {
                break;
            };
            if joint.id != dense {
                changes.push((joint.id, dense));
                joint.id = dense;
            }
        }

        for connector in &mut self.connectors {
            for (old, new) in &changes {
                if connector.start == *old {
                    connector.start = *new;
                    break;
                }
            }
            for (old, new) in &changes {
                if connector.end == *old {
                    connector.end = *new;
                    break;
                }
            }
        }

        self.next_joint = self.joints.len();
        trace!(joints = self.joints.len(), remapped = changes.len(); "Compacted joint indices");
    }

    /// Gives the joint `current` the identity `new`, remapping its connectors.
    ///
    /// The identity watermark is raised to at least `new + 1`.
    ///
    /// # Errors
    ///
    /// - [`GraphError::UnknownJoint`] if `current` is missing.
    /// - [`GraphError::IdentityInUse`] if another joint already holds `new`.
    pub fn reassign_identity(&mut self, current: JointId, new: JointId) -> Result<(), GraphError> {
        if current == new {
            return Ok(());
        }
        if self.joint(new).is_some() {
            return Err(GraphError::IdentityInUse(new));
        }
        self.joint_mut(current)?.id = new;

        for connector in &mut self.connectors {
            if connector.start == current {
                connector.start = new;
            }
            if connector.end == current {
                connector.end = new;
            }
        }
        self.next_joint = self.next_joint.max(new.index() + 1);

        debug!(from = current.to_string(), to = new.to_string(); "Reassigned joint identity");
        Ok(())
    }

    /// Sets a joint's component and size directly, as read from a node token.
    ///
    /// Unlike the interactive edits in [`crate::edit`], this accepts any size
    /// for any component.
    pub fn configure_joint(
        &mut self,
        id: JointId,
        component: ComponentType,
        size: u32,
    ) -> Result<(), GraphError> {
        let joint = self.joint_mut(id)?;
        joint.set_component(component);
        joint.set_size(size);
        Ok(())
    }

    /// Marks a joint's identity as reconciled.
    pub fn lock(&mut self, id: JointId) -> Result<(), GraphError> {
        self.joint_mut(id)?.locked = true;
        Ok(())
    }

    /// Returns the four growth handles of a joint.
    pub fn handles(&self, id: JointId) -> Result<[Handle; 4], GraphError> {
        let position = self.position_of(id)?;
        Ok(Direction::ALL.map(|direction| {
            let target = position.step(direction).ok();
            let open = target.is_some_and(|target| self.connector_at(position, target).is_none());
            Handle {
                direction,
                target,
                open,
            }
        }))
    }

    /// Returns joints that cannot be reached from the root along connectors.
    pub fn unreachable_joints(&self) -> Vec<JointId> {
        let mut graph: DiGraphMap<JointId, ()> = DiGraphMap::new();
        for joint in &self.joints {
            graph.add_node(joint.id);
        }
        for connector in &self.connectors {
            graph.add_edge(connector.start, connector.end, ());
        }

        let mut reached = Vec::with_capacity(self.joints.len());
        let mut bfs = Bfs::new(&graph, self.root().id);
        while let Some(id) = bfs.next(&graph) {
            reached.push(id);
        }

        self.joints
            .iter()
            .map(|joint| joint.id)
            .filter(|id| !reached.contains(id))
            .collect()
    }

    fn index_of(&self, id: JointId) -> Option<usize> {
        self.joints.iter().position(|joint| joint.id == id)
    }

    fn position_of(&self, id: JointId) -> Result<Position, GraphError> {
        self.joint(id)
            .map(Joint::position)
            .ok_or(GraphError::UnknownJoint(id))
    }

    fn midpoint_of(&self, connector: &Connector) -> Option<Midpoint> {
        let start = self.joint(connector.start)?.position;
        let end = self.joint(connector.end)?.position;
        Some(Midpoint::between(start, end))
    }

    fn ensure_midpoint_free(&self, start: Position, end: Position) -> Result<(), GraphError> {
        if self.connector_at(start, end).is_some() {
            return Err(GraphError::DuplicateMidpoint { start, end });
        }
        Ok(())
    }

    fn insert_connector(&mut self, start: JointId, end: JointId, terminal: bool) -> ConnectorId {
        let id = ConnectorId::new(self.next_connector);
        self.next_connector += 1;
        self.connectors.push(Connector {
            id,
            start,
            end,
            terminal,
        });

        debug!(
            connector = id.value(),
            start = start.to_string(),
            end = end.to_string(),
            terminal;
            "Created connector"
        );
        id
    }

    pub(crate) fn set_terminal(&mut self, id: ConnectorId, terminal: bool) {
        if let Some(connector) = self.connectors.iter_mut().find(|c| c.id == id) {
            connector.terminal = terminal;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(x: i32, z: i32) -> Position {
        Position::new(x, z).unwrap()
    }

    fn id(symbol: char) -> JointId {
        JointId::from_symbol(symbol).unwrap()
    }

    /// Square cycle a(0,0) -> b(1,0) -> c(1,1) -> d(0,1) -> a.
    fn square() -> AssemblyGraph {
        let mut graph = AssemblyGraph::new();
        graph.connect(id('a'), Direction::PosX).unwrap();
        graph.connect(id('b'), Direction::PosZ).unwrap();
        graph.connect(id('c'), Direction::NegX).unwrap();
        graph.connect(id('d'), Direction::NegZ).unwrap();
        graph
    }

    #[test]
    fn test_new_graph_has_locked_root() {
        let graph = AssemblyGraph::new();

        assert_eq!(graph.joints_count(), 1);
        assert_eq!(graph.connectors_count(), 0);
        let root = graph.root();
        assert_eq!(root.id(), JointId::ROOT);
        assert_eq!(root.position(), Position::ORIGIN);
        assert_eq!(root.component(), ComponentType::None);
        assert_eq!(root.size(), 0);
        assert!(root.is_locked());
    }

    #[test]
    fn test_create_joint_duplicate_position() {
        let mut graph = AssemblyGraph::new();

        let err = graph.create_joint(Position::ORIGIN).unwrap_err();
        assert_eq!(err, GraphError::DuplicatePosition(Position::ORIGIN));
        assert_eq!(graph.joints_count(), 1);
    }

    #[test]
    fn test_create_connector_invalid_delta() {
        let mut graph = AssemblyGraph::new();
        let far = graph.create_joint(pos(1, 1)).unwrap();

        let err = graph.create_connector(JointId::ROOT, far).unwrap_err();
        assert!(matches!(err, GraphError::InvalidDelta { .. }));
        assert_eq!(graph.connectors_count(), 0);
    }

    #[test]
    fn test_create_connector_duplicate_midpoint() {
        let mut graph = AssemblyGraph::new();
        let b = graph.create_joint(pos(1, 0)).unwrap();
        graph.create_connector(JointId::ROOT, b).unwrap();

        let err = graph.create_connector(b, JointId::ROOT).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateMidpoint { .. }));
        assert_eq!(graph.connectors_count(), 1);
    }

    #[test]
    fn test_connect_creates_terminal_joint() {
        let mut graph = AssemblyGraph::new();

        let connection = graph.connect(JointId::ROOT, Direction::PosZ).unwrap();

        assert!(connection.terminal);
        assert_eq!(connection.joint, id('b'));
        assert_eq!(graph.joint(id('b')).unwrap().position(), pos(0, 1));
        assert!(!graph.joint(id('b')).unwrap().is_locked());
    }

    #[test]
    fn test_connect_closes_cycle() {
        let graph = square();

        assert_eq!(graph.joints_count(), 4);
        assert_eq!(graph.connectors_count(), 4);
        let closing = graph.connectors().last().unwrap();
        assert!(!closing.is_terminal());
        assert_eq!(closing.end(), JointId::ROOT);
        assert_eq!(graph.connectors().filter(|c| c.is_terminal()).count(), 3);
    }

    #[test]
    fn test_connect_off_lattice() {
        let mut graph = AssemblyGraph::new();
        for _ in 0..3 {
            let last = graph.joints().last().unwrap().id();
            graph.connect(last, Direction::PosX).unwrap();
        }
        let edge = graph.joint_at(pos(3, 0)).unwrap().id();

        let err = graph.connect(edge, Direction::PosX).unwrap_err();
        assert!(matches!(err, GraphError::OutOfLattice(_)));
        assert_eq!(graph.joints_count(), 4);
    }

    #[test]
    fn test_connect_used_handle_leaves_graph_unchanged() {
        let mut graph = AssemblyGraph::new();
        graph.connect(JointId::ROOT, Direction::PosX).unwrap();
        let before = graph.clone();

        let err = graph.connect(id('b'), Direction::NegX).unwrap_err();
        assert!(matches!(err, GraphError::DuplicateMidpoint { .. }));
        assert_eq!(graph, before);
    }

    #[test]
    fn test_remove_joint_refuses_root() {
        let mut graph = AssemblyGraph::new();
        assert_eq!(graph.remove_joint(JointId::ROOT), Err(GraphError::RootJoint));
    }

    #[test]
    fn test_remove_joint_drops_touching_connectors() {
        let mut graph = square();

        graph.remove_joint(id('c')).unwrap();

        assert_eq!(graph.joints_count(), 3);
        assert_eq!(graph.connectors_count(), 2);
        assert!(
            graph
                .connectors()
                .all(|c| c.start() != id('c') && c.end() != id('c'))
        );
    }

    #[test]
    fn test_compact_indices_dense_and_remapped() {
        let mut graph = square();
        graph.remove_joint(id('b')).unwrap();

        graph.compact_indices();

        let ids: Vec<usize> = graph.joints().map(|j| j.id().index()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(graph.next_identity(), 3);
        // c(1,1) became b, d(0,1) became c
        assert_eq!(graph.joint(id('b')).unwrap().position(), pos(1, 1));
        assert_eq!(graph.joint(id('c')).unwrap().position(), pos(0, 1));
        let endpoints: Vec<(char, char)> = graph
            .connectors()
            .map(|c| (c.start().symbol(), c.end().symbol()))
            .collect();
        assert_eq!(endpoints, vec![('b', 'c'), ('c', 'a')]);
    }

    #[test]
    fn test_reassign_identity_raises_watermark() {
        let mut graph = AssemblyGraph::new();
        let connection = graph.connect(JointId::ROOT, Direction::PosX).unwrap();

        graph.reassign_identity(connection.joint, id('e')).unwrap();

        assert!(graph.joint(id('b')).is_none());
        assert_eq!(graph.joint(id('e')).unwrap().position(), pos(1, 0));
        assert_eq!(graph.next_identity(), 5);
        assert_eq!(graph.connectors().next().unwrap().end(), id('e'));
    }

    #[test]
    fn test_reassign_identity_in_use() {
        let mut graph = AssemblyGraph::new();
        graph.connect(JointId::ROOT, Direction::PosX).unwrap();

        let err = graph.reassign_identity(id('b'), JointId::ROOT).unwrap_err();
        assert_eq!(err, GraphError::IdentityInUse(JointId::ROOT));
    }

    #[test]
    fn test_handles_reflect_connectors() {
        let mut graph = AssemblyGraph::new();
        graph.connect(JointId::ROOT, Direction::PosX).unwrap();

        let handles = graph.handles(JointId::ROOT).unwrap();
        let open: Vec<Direction> = handles
            .iter()
            .filter(|h| h.open)
            .map(|h| h.direction)
            .collect();
        assert_eq!(
            open,
            vec![Direction::NegX, Direction::PosZ, Direction::NegZ]
        );

        let far_handles = graph.handles(id('b')).unwrap();
        assert!(!far_handles[1].open, "negx handle of b shares the connector");
    }

    #[test]
    fn test_unreachable_joints() {
        let mut graph = AssemblyGraph::new();
        graph.connect(JointId::ROOT, Direction::PosX).unwrap();
        graph.create_joint(pos(-2, -2)).unwrap();

        assert_eq!(graph.unreachable_joints(), vec![id('c')]);
    }
}
