//! Designs arriving from outside the session.
//!
//! A transport (saved-design browser, design suggestion service) deserializes
//! these messages and sends them on the channel returned by
//! [`Designer::sender`](crate::Designer::sender). The session applies them when
//! [`Designer::drain`](crate::Designer::drain) is called.

use serde::{Deserialize, Serialize};

/// A previously saved design together with its evaluation results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDesign {
    pub tag: String,
    pub config: String,
    /// Range in miles.
    pub range: f64,
    /// Payload capacity in pounds.
    pub capacity: f64,
    /// Cost in dollars.
    pub cost: f64,
    /// Velocity in miles per hour.
    pub velocity: f64,
}

/// Predicted performance of a suggested design.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub range: f64,
    pub cost: f64,
    pub capacity: f64,
}

/// A suggested design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub config: String,
    pub metrics: Metrics,
}

/// A message for the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inbound {
    /// Open a saved design, replacing the current one.
    StoredDesign(StoredDesign),
    /// A batch of suggested designs the user may pick from.
    Candidates { candidates: Vec<Candidate> },
}
