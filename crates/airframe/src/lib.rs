//! Airframe - interactive design sessions for grammar-encoded vehicles.
//!
//! A [`Designer`] owns the assembly graph of the design being edited, its
//! payload capacity, an undo/redo history of configuration strings and a
//! queue of designs arriving from outside. Every change is reported on the
//! `airframe::activity` log target.

pub mod config;
pub mod history;
pub mod inbound;

mod error;

pub use airframe_core::{component, edit, graph, identifier, lattice};
pub use airframe_grammar::{Diagnostic, ParseError};

pub use error::AirframeError;

use std::sync::mpsc::{self, Receiver, Sender};

use log::{debug, info, warn};

use airframe_core::{
    component::ComponentType,
    edit::{Edit, EditError},
    graph::AssemblyGraph,
    identifier::{ConnectorId, JointId},
    lattice::Direction,
};
use airframe_grammar::Decoded;

use config::AppConfig;
use history::History;
use inbound::{Candidate, Inbound, StoredDesign};

const ACTIVITY: &str = "airframe::activity";

/// Outcome of loading a configuration string.
#[derive(Debug)]
pub enum Load {
    /// The text decoded; holds its non-fatal diagnostics.
    Decoded { warnings: Vec<Diagnostic> },
    /// The text did not decode and the default design was loaded instead.
    Fallback { error: ParseError },
}

impl Load {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Load::Fallback { .. })
    }
}

/// An editing session over one vehicle design.
///
/// # Examples
///
/// ```
/// use airframe::{Designer, config::AppConfig, identifier::JointId, lattice::Direction};
///
/// let mut designer = Designer::new(AppConfig::default()).expect("default design decodes");
///
/// designer.grow(JointId::ROOT, Direction::PosX).unwrap_err();
/// let edit = designer.grow(JointId::from_symbol('b').unwrap(), Direction::PosX).unwrap();
/// assert_eq!(edit.name(), "AssemblyChange");
///
/// designer.undo().unwrap();
/// assert_eq!(designer.encode(), airframe::config::DEFAULT_DESIGN);
/// ```
pub struct Designer {
    config: AppConfig,
    graph: AssemblyGraph,
    capacity: u32,
    history: History,
    candidates: Vec<Candidate>,
    sender: Sender<Inbound>,
    receiver: Receiver<Inbound>,
}

impl Designer {
    /// Start a session on the configured default design.
    ///
    /// # Errors
    ///
    /// Returns [`AirframeError::DefaultDesign`] if the default design does not
    /// decode. This is the one condition a session cannot recover from.
    pub fn new(config: AppConfig) -> Result<Self, AirframeError> {
        let default = config.design().default_config();
        let decoded = airframe_grammar::decode(default)
            .map_err(|err| AirframeError::new_default_design_error(err, default))?;
        let (sender, receiver) = mpsc::channel();

        let mut designer = Self {
            history: History::new(config.design().history_limit()),
            graph: decoded.graph,
            capacity: decoded.capacity,
            candidates: Vec::new(),
            sender,
            receiver,
            config,
        };
        let initial = designer.encode();
        designer.history.record(initial);

        info!(joints = designer.graph.joints_count(); "Design session started");
        Ok(designer)
    }

    /// Returns the graph of the current design.
    pub fn graph(&self) -> &AssemblyGraph {
        &self.graph
    }

    /// Returns the payload capacity of the current design.
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns the suggested designs received most recently.
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    /// Encode the current design as a configuration string.
    pub fn encode(&self) -> String {
        airframe_grammar::encode(&self.graph, self.capacity)
    }

    /// Load a configuration string and record it in the history.
    ///
    /// When `text` does not decode, the failure is logged as a warning and the
    /// default design is loaded instead. The current design is replaced only
    /// by a fully rebuilt graph.
    ///
    /// # Errors
    ///
    /// Returns [`AirframeError::DefaultDesign`] if the fallback fails too.
    pub fn load(&mut self, text: &str) -> Result<Load, AirframeError> {
        let load = self.replace(text)?;
        let config = self.encode();
        self.history.record(config.as_str());
        info!(target: ACTIVITY, action = "Loaded", config = config.as_str(); "Design loaded");
        Ok(load)
    }

    /// Return to the default design.
    pub fn reset_design(&mut self) -> Result<(), AirframeError> {
        let default = self.config.design().default_config().to_string();
        self.install(&default)
            .map_err(|err| AirframeError::new_default_design_error(err, default))?;
        let config = self.encode();
        self.history.record(config.as_str());
        info!(target: ACTIVITY, action = "ResetDesign", config = config.as_str(); "Design reset");
        Ok(())
    }

    /// Cycle the component mounted on a joint.
    pub fn toggle_component(&mut self, id: JointId) -> Result<Edit, AirframeError> {
        self.apply(|graph| graph.toggle_component(id))
    }

    /// Mount `component` on a joint.
    pub fn set_component(
        &mut self,
        id: JointId,
        component: ComponentType,
    ) -> Result<Edit, AirframeError> {
        self.apply(|graph| graph.set_component(id, component))
    }

    pub fn clear_component(&mut self, id: JointId) -> Result<Edit, AirframeError> {
        self.apply(|graph| graph.clear_component(id))
    }

    pub fn scale_up(&mut self, id: JointId) -> Result<Edit, AirframeError> {
        self.apply(|graph| graph.scale_up(id))
    }

    pub fn scale_down(&mut self, id: JointId) -> Result<Edit, AirframeError> {
        self.apply(|graph| graph.scale_down(id))
    }

    /// Grow a connector from a joint's handle.
    pub fn grow(&mut self, id: JointId, direction: Direction) -> Result<Edit, AirframeError> {
        self.apply(|graph| graph.grow(id, direction))
    }

    /// Delete a trailing connector.
    pub fn delete_connector(&mut self, id: ConnectorId) -> Result<Edit, AirframeError> {
        self.apply(|graph| graph.delete_connector(id))
    }

    /// Set the payload capacity from user input.
    ///
    /// # Errors
    ///
    /// Returns [`AirframeError::InvalidCapacity`] unless `text` is a positive
    /// whole number. The previous capacity is kept.
    pub fn set_capacity(&mut self, text: &str) -> Result<u32, AirframeError> {
        let capacity = text
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|&capacity| capacity >= 1)
            .ok_or_else(|| AirframeError::InvalidCapacity(text.to_string()))?;

        if capacity != self.capacity {
            self.capacity = capacity;
            let config = self.encode();
            self.history.record(config.as_str());
            info!(target: ACTIVITY, action = "CapacityChange", config = config.as_str(), capacity = capacity; "Capacity changed");
        }
        Ok(capacity)
    }

    /// Step back in the history. Returns `false` at the oldest entry.
    pub fn undo(&mut self) -> Result<bool, AirframeError> {
        let Some(config) = self.history.undo().map(str::to_owned) else {
            return Ok(false);
        };
        info!(target: ACTIVITY, action = "Undo", config = config.as_str(); "Undo");
        self.replace(&config)?;
        Ok(true)
    }

    /// Step forward in the history. Returns `false` at the newest entry.
    pub fn redo(&mut self) -> Result<bool, AirframeError> {
        let Some(config) = self.history.redo().map(str::to_owned) else {
            return Ok(false);
        };
        info!(target: ACTIVITY, action = "Redo", config = config.as_str(); "Redo");
        self.replace(&config)?;
        Ok(true)
    }

    /// Returns a sender for inbound messages.
    pub fn sender(&self) -> Sender<Inbound> {
        self.sender.clone()
    }

    /// Apply every queued inbound message. Returns how many were applied.
    pub fn drain(&mut self) -> Result<usize, AirframeError> {
        let mut count = 0;
        while let Ok(message) = self.receiver.try_recv() {
            match message {
                Inbound::StoredDesign(design) => {
                    self.open_stored(&design)?;
                }
                Inbound::Candidates { candidates } => {
                    debug!(count = candidates.len(); "Received candidate designs");
                    self.candidates = candidates;
                }
            }
            count += 1;
        }
        Ok(count)
    }

    /// Open a saved design.
    pub fn open_stored(&mut self, design: &StoredDesign) -> Result<Load, AirframeError> {
        let load = self.replace(&design.config)?;
        let config = self.encode();
        self.history.record(config.as_str());
        info!(
            target: ACTIVITY,
            action = "Opened",
            tag = design.tag.as_str(),
            config = config.as_str(),
            range = design.range,
            capacity = design.capacity,
            cost = design.cost,
            velocity = design.velocity;
            "Opened stored design"
        );
        Ok(load)
    }

    /// Switch to a suggested design and discard the other suggestions.
    pub fn apply_candidate(&mut self, candidate: &Candidate) -> Result<Load, AirframeError> {
        let load = self.replace(&candidate.config)?;
        self.candidates.clear();
        let config = self.encode();
        self.history.record(config.as_str());
        info!(
            target: ACTIVITY,
            action = "SelectedAIDesign",
            config = config.as_str(),
            range = candidate.metrics.range,
            cost = candidate.metrics.cost,
            capacity = candidate.metrics.capacity;
            "Selected suggested design"
        );
        Ok(load)
    }

    fn apply(
        &mut self,
        edit: impl FnOnce(&mut AssemblyGraph) -> Result<Edit, EditError>,
    ) -> Result<Edit, AirframeError> {
        let edit = match edit(&mut self.graph) {
            Ok(edit) => edit,
            Err(err) => {
                debug!(err:% = err; "Edit rejected");
                return Err(err.into());
            }
        };

        if edit.is_change() {
            let config = self.encode();
            self.history.record(config.as_str());
            info!(
                target: ACTIVITY,
                action = edit.name(),
                config = config.as_str(),
                position:% = edit.position;
                "{edit}"
            );
        } else if let Some(notice) = edit.notice() {
            info!(action = edit.name(), position:% = edit.position; "{notice}");
        }
        Ok(edit)
    }

    /// Decode `text` into the session, falling back to the default design once.
    fn replace(&mut self, text: &str) -> Result<Load, AirframeError> {
        match self.install(text) {
            Ok(warnings) => {
                for warning in &warnings {
                    let token = warning.token_text(text).unwrap_or_default();
                    warn!(warning:% = warning, token; "Configuration loaded with warnings");
                }
                Ok(Load::Decoded { warnings })
            }
            Err(error) => {
                warn!(config = text, error:% = error; "Configuration rejected, loading default design");
                let default = self.config.design().default_config().to_string();
                self.install(&default)
                    .map_err(|err| AirframeError::new_default_design_error(err, default))?;
                Ok(Load::Fallback { error })
            }
        }
    }

    fn install(&mut self, text: &str) -> Result<Vec<Diagnostic>, ParseError> {
        let Decoded {
            graph,
            capacity,
            warnings,
        } = airframe_grammar::decode(text)?;
        self.graph = graph;
        self.capacity = capacity;
        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use airframe_core::edit::Resize;

    use super::*;
    use crate::config::{DEFAULT_DESIGN, DesignConfig};

    fn designer() -> Designer {
        Designer::new(AppConfig::default()).unwrap()
    }

    #[test]
    fn test_new_records_default() {
        let designer = designer();

        assert_eq!(designer.encode(), DEFAULT_DESIGN);
        assert_eq!(designer.capacity(), 5);
        assert_eq!(designer.history().len(), 1);
    }

    #[test]
    fn test_invalid_default_is_fatal() {
        let config = AppConfig::new(DesignConfig::new("*aQQ0,5,3", 10));

        let err = Designer::new(config).err().unwrap();

        assert!(matches!(err, AirframeError::DefaultDesign { .. }));
    }

    #[test]
    fn test_no_op_edit_not_recorded() {
        let mut designer = designer();
        designer
            .grow(JointId::from_symbol('b').unwrap(), Direction::PosX)
            .unwrap();
        let new_joint = JointId::from_symbol('f').unwrap();
        designer
            .set_component(new_joint, ComponentType::Foil)
            .unwrap();
        assert_eq!(designer.history().len(), 3);

        let edit = designer.scale_down(new_joint).unwrap();

        assert_eq!(edit.action, edit::Action::ScaleDown(Resize::AtFloor));
        assert!(edit.notice().is_some());
        assert_eq!(designer.history().len(), 3);
    }

    #[test]
    fn test_scale_empty_joint() {
        let mut designer = designer();
        designer
            .grow(JointId::from_symbol('b').unwrap(), Direction::PosX)
            .unwrap();
        let new_joint = JointId::from_symbol('f').unwrap();

        let edit = designer.scale_up(new_joint).unwrap();

        assert_eq!(edit.action, edit::Action::ScaleUp(Resize::NoComponent));
        assert_eq!(designer.history().len(), 2);
    }

    #[test]
    fn test_rejected_edit_keeps_design() {
        let mut designer = designer();

        let err = designer.grow(JointId::ROOT, Direction::PosX).unwrap_err();

        assert!(matches!(err, AirframeError::Edit(_)));
        assert_eq!(designer.encode(), DEFAULT_DESIGN);
        assert_eq!(designer.history().len(), 1);
    }

    #[test]
    fn test_set_capacity() {
        let mut designer = designer();

        assert_eq!(designer.set_capacity(" 8 ").unwrap(), 8);
        assert!(designer.encode().ends_with(",8,3"));
        assert!(matches!(
            designer.set_capacity("0"),
            Err(AirframeError::InvalidCapacity(_))
        ));
        assert!(designer.set_capacity("").is_err());
        assert!(designer.set_capacity("2.5").is_err());
        assert_eq!(designer.capacity(), 8);
        assert_eq!(designer.history().len(), 2);
    }

    #[test]
    fn test_load_falls_back_to_default() {
        let mut designer = designer();
        designer.set_capacity("9").unwrap();

        let load = designer.load("*aMM0^ab,5,3").unwrap();

        assert!(load.is_fallback());
        assert_eq!(designer.encode(), DEFAULT_DESIGN);
    }

    #[test]
    fn test_undo_redo_restore_designs() {
        let mut designer = designer();
        designer.toggle_component(JointId::ROOT).unwrap();
        let toggled = designer.encode();

        assert!(designer.undo().unwrap());
        assert_eq!(designer.encode(), DEFAULT_DESIGN);
        assert!(!designer.undo().unwrap());
        assert!(designer.redo().unwrap());
        assert_eq!(designer.encode(), toggled);
        assert!(!designer.redo().unwrap());
    }
}
