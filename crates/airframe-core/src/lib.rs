//! Airframe Core Types and Definitions
//!
//! This crate provides the assembly model behind the Airframe vehicle
//! configuration grammar. It includes:
//!
//! - **Lattice**: Symbol mapping and positions on the joint lattice ([`lattice`] module)
//! - **Identifiers**: Joint and connector identities ([`identifier`] module)
//! - **Components**: What can be mounted on a joint ([`component::ComponentType`])
//! - **Graph**: The joint/connector arena with its invariants ([`graph::AssemblyGraph`])
//! - **Edits**: Interactive mutations with activity records ([`edit`] module)

pub mod component;
pub mod edit;
pub mod graph;
pub mod identifier;
pub mod lattice;
