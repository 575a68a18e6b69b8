//! Interactive edits on an assembly graph.
//!
//! These are the operations a user performs one at a time while designing:
//! choosing a component, resizing it, growing a connector from a handle, and
//! deleting a trailing connector. Each returns an [`Edit`] describing what
//! happened, suitable for an activity log. Failed edits leave the graph
//! exactly as it was.

use std::fmt;

use log::debug;
use thiserror::Error;

use crate::{
    component::ComponentType,
    graph::{AssemblyGraph, GraphError},
    identifier::{ConnectorId, JointId},
    lattice::{Direction, Position},
};

/// Errors raised by interactive edits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// The connector has further structure beyond its end joint.
    #[error("connector {0} is not an ending connection")]
    IllegalDeletion(ConnectorId),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Result of a resize request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resize {
    /// The size changed; holds the new size.
    Resized(u32),
    /// The component is already at its smallest size.
    AtFloor,
    /// The joint carries no component, so there is nothing to scale.
    NoComponent,
}

/// What an edit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Component {
        from: ComponentType,
        to: ComponentType,
    },
    ClearComponent {
        from: ComponentType,
    },
    ScaleUp(Resize),
    ScaleDown(Resize),
    Grow {
        direction: Direction,
        connector: ConnectorId,
        terminal: bool,
    },
    RemoveConnector {
        connector: ConnectorId,
        removed_joint: bool,
    },
}

/// A completed edit: the action and the position of the joint it was applied at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub action: Action,
    pub position: Position,
}

impl Edit {
    /// Returns `false` for edits that were accepted but changed nothing.
    pub fn is_change(&self) -> bool {
        !matches!(
            self.action,
            Action::ScaleUp(Resize::AtFloor | Resize::NoComponent)
                | Action::ScaleDown(Resize::AtFloor | Resize::NoComponent)
        )
    }

    /// Returns the activity-log name of the action.
    pub fn name(&self) -> &'static str {
        match self.action {
            Action::Component { to, .. } => match to {
                ComponentType::Structure => "ToggleStructure",
                ComponentType::MotorCW => "ToggleCWMotor",
                ComponentType::MotorCCW => "ToggleCCWMotor",
                ComponentType::Foil => "ToggleFoil",
                ComponentType::None => "ToggleEmpty",
            },
            Action::ClearComponent { .. } => "RemovedComponent",
            Action::ScaleUp(_) => "ScaleUp",
            Action::ScaleDown(_) => "ScaleDown",
            Action::Grow { .. } => "AssemblyChange",
            Action::RemoveConnector { .. } => "RemovedConnector",
        }
    }

    /// Returns a user-facing message for edits that changed nothing.
    pub fn notice(&self) -> Option<&'static str> {
        match self.action {
            Action::ScaleDown(Resize::AtFloor) => Some("Component is already at its smallest size"),
            Action::ScaleUp(Resize::NoComponent) | Action::ScaleDown(Resize::NoComponent) => {
                Some("No component to resize")
            }
            _ => None,
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{}", self.name(), self.position)?;
        if let Action::Grow { direction, .. } = self.action {
            write!(f, ",{direction}")?;
        }
        Ok(())
    }
}

impl AssemblyGraph {
    /// Mounts `component` on a joint, keeping its size.
    pub fn set_component(
        &mut self,
        id: JointId,
        component: ComponentType,
    ) -> Result<Edit, EditError> {
        let joint = self.joint_mut(id)?;
        let from = joint.component();
        joint.set_component(component);
        let position = joint.position();

        debug!(joint = id.to_string(), from = from.to_string(), to = component.to_string(); "Set component");
        Ok(Edit {
            action: Action::Component {
                from,
                to: component,
            },
            position,
        })
    }

    /// Advances a joint's component along the toggle cycle.
    pub fn toggle_component(&mut self, id: JointId) -> Result<Edit, EditError> {
        let next = self
            .joint(id)
            .ok_or(GraphError::UnknownJoint(id))?
            .component()
            .next();
        self.set_component(id, next)
    }

    /// Removes the component from a joint. Topology is untouched.
    pub fn clear_component(&mut self, id: JointId) -> Result<Edit, EditError> {
        let edit = self.set_component(id, ComponentType::None)?;
        let Action::Component { from, .. } = edit.action else {
            return Ok(edit);
        };
        Ok(Edit {
            action: Action::ClearComponent { from },
            position: edit.position,
        })
    }

    /// Grows the component at a joint by one size increment.
    pub fn scale_up(&mut self, id: JointId) -> Result<Edit, EditError> {
        let joint = self.joint_mut(id)?;
        let resize = if joint.component().is_mounted() {
            let size = joint.size().saturating_add(1);
            joint.set_size(size);
            Resize::Resized(size)
        } else {
            Resize::NoComponent
        };

        Ok(Edit {
            action: Action::ScaleUp(resize),
            position: joint.position(),
        })
    }

    /// Shrinks the component at a joint by one size increment.
    ///
    /// Shrinking below size zero is a no-op reported as [`Resize::AtFloor`].
    pub fn scale_down(&mut self, id: JointId) -> Result<Edit, EditError> {
        let joint = self.joint_mut(id)?;
        let resize = match (joint.component().is_mounted(), joint.size()) {
            (false, _) => Resize::NoComponent,
            (true, 0) => Resize::AtFloor,
            (true, size) => {
                joint.set_size(size - 1);
                Resize::Resized(size - 1)
            }
        };

        Ok(Edit {
            action: Action::ScaleDown(resize),
            position: joint.position(),
        })
    }

    /// Grows a connector from the joint's handle in `direction`.
    ///
    /// Growing onto an existing joint closes a cycle; the handle stays closed
    /// for as long as the resulting connector exists.
    pub fn grow(&mut self, id: JointId, direction: Direction) -> Result<Edit, EditError> {
        let position = self
            .joint(id)
            .ok_or(GraphError::UnknownJoint(id))?
            .position();
        let connection = self.connect(id, direction)?;

        Ok(Edit {
            action: Action::Grow {
                direction,
                connector: connection.connector,
                terminal: connection.terminal,
            },
            position,
        })
    }

    /// Deletes a trailing connector.
    ///
    /// The connector qualifies only if no other connector starts at its end
    /// joint. The end joint is deleted when nothing else ends there; otherwise
    /// a remaining incoming connector takes over as the terminal one. Joint
    /// indices are compacted afterwards.
    ///
    /// # Errors
    ///
    /// - [`EditError::IllegalDeletion`] if another connector starts at the end joint.
    /// - [`GraphError::UnknownConnector`] if the connector is missing.
    pub fn delete_connector(&mut self, id: ConnectorId) -> Result<Edit, EditError> {
        let connector = *self
            .connector(id)
            .ok_or(GraphError::UnknownConnector(id))?;
        let end = connector.end();

        if self.outgoing(end).any(|other| other.id() != id) {
            return Err(EditError::IllegalDeletion(id));
        }
        let position = self
            .joint(connector.start())
            .ok_or(GraphError::UnknownJoint(connector.start()))?
            .position();
        let remaining: Vec<ConnectorId> = self
            .incoming(end)
            .filter(|other| other.id() != id)
            .map(|other| other.id())
            .collect();

        self.remove_connector(id)?;
        let removed_joint = remaining.is_empty() && end != JointId::ROOT;
        if removed_joint {
            self.remove_joint(end)?;
        } else if connector.is_terminal() {
            if let Some(&successor) = remaining.first() {
                self.set_terminal(successor, true);
            }
        }
        self.compact_indices();

        Ok(Edit {
            action: Action::RemoveConnector {
                connector: id,
                removed_joint,
            },
            position,
        })
    }
}
