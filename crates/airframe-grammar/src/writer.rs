//! Serialization of an assembly graph back to a configuration string.

use airframe_core::graph::AssemblyGraph;

use crate::tokens::CONTROLLER;

/// Encodes a graph and capacity as a configuration string.
///
/// Node tokens follow the arena order of the joints, edge tokens the creation
/// order of the connectors. The controller is always written as `3`.
///
/// # Examples
///
/// ```
/// # use airframe_core::{graph::AssemblyGraph, lattice::Direction, identifier::JointId};
/// # use airframe_grammar::encode;
/// let mut graph = AssemblyGraph::new();
/// graph.connect(JointId::ROOT, Direction::PosX).unwrap();
///
/// assert_eq!(encode(&graph, 5), "*aMM4*bNM4^ab,5,3");
/// ```
pub fn encode(graph: &AssemblyGraph, capacity: u32) -> String {
    let mut out = String::with_capacity(graph.joints_count() * 8 + graph.connectors_count() * 3 + 8);

    for joint in graph.joints() {
        let (x, z) = joint.position().symbols();
        out.push('*');
        out.push(joint.id().symbol());
        out.push(x);
        out.push(z);
        out.push(joint.component().digit());
        out.extend(std::iter::repeat_n('+', joint.size() as usize));
    }
    for connector in graph.connectors() {
        out.push('^');
        out.push(connector.start().symbol());
        out.push(connector.end().symbol());
    }
    out.push_str(&format!(",{capacity},{CONTROLLER}"));

    out
}

#[cfg(test)]
mod tests {
    use airframe_core::{component::ComponentType, identifier::JointId, lattice::Direction};

    use super::*;

    #[test]
    fn test_encode_root_only() {
        assert_eq!(encode(&AssemblyGraph::new(), 2), "*aMM4,2,3");
    }

    #[test]
    fn test_encode_sizes_and_components() {
        let mut graph = AssemblyGraph::new();
        let connection = graph.connect(JointId::ROOT, Direction::NegZ).unwrap();
        graph
            .configure_joint(JointId::ROOT, ComponentType::Structure, 5)
            .unwrap();
        graph
            .configure_joint(connection.joint, ComponentType::MotorCW, 3)
            .unwrap();

        assert_eq!(encode(&graph, 5), "*aMM0+++++*bML1+++^ab,5,3");
    }
}
