//! Configuration types for Airframe design sessions.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file by the command-line front end.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`DesignConfig`] - The default design and history settings of a session.
//!
//! # Example
//!
//! ```
//! # use airframe::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.design().history_limit(), 100);
//! ```

use serde::Deserialize;

/// The design every session starts from: a central structure with four motors.
pub const DEFAULT_DESIGN: &str = "*aMM0+++++*bNM2+++*cMN1+++*dLM2+++*eML1+++^ab^ac^ad^ae,5,3";

const DEFAULT_HISTORY_LIMIT: usize = 100;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Design session section.
    #[serde(default)]
    design: DesignConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the given design settings.
    pub fn new(design: DesignConfig) -> Self {
        Self { design }
    }

    /// Returns the design session configuration.
    pub fn design(&self) -> &DesignConfig {
        &self.design
    }
}

/// Settings for a design session.
#[derive(Debug, Clone, Deserialize)]
pub struct DesignConfig {
    /// Configuration string loaded at start and used as the decode fallback.
    #[serde(default = "default_config")]
    default_config: String,

    /// Maximum number of entries kept in the undo history.
    #[serde(default = "default_history_limit")]
    history_limit: usize,
}

impl DesignConfig {
    /// Creates a new [`DesignConfig`].
    ///
    /// # Arguments
    ///
    /// * `default_config` - Configuration string of the base design.
    /// * `history_limit` - Maximum number of undo entries; values below 1 are raised to 1.
    pub fn new(default_config: impl Into<String>, history_limit: usize) -> Self {
        Self {
            default_config: default_config.into(),
            history_limit,
        }
    }

    /// Returns the configuration string of the base design.
    pub fn default_config(&self) -> &str {
        &self.default_config
    }

    /// Returns the maximum number of undo entries, at least 1.
    pub fn history_limit(&self) -> usize {
        self.history_limit.max(1)
    }
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            default_config: default_config(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

fn default_config() -> String {
    DEFAULT_DESIGN.to_string()
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}
