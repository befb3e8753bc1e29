//! Editor configuration with documented defaults
//!
//! Values can be loaded from a TOML document; every field is optional and
//! falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::error::{LoadoutError, Result};
use crate::core::types::UpgradeId;

/// Configuration for loadout editing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    // === HISTORY ===
    /// Maximum number of undo entries kept per operation stack
    ///
    /// Oldest entries are dropped once the limit is reached. Coalesced edits
    /// (armor drags) count as a single entry.
    pub history_depth: usize,

    // === NEW LOADOUTS ===
    /// Structure upgrade selected on a fresh loadout
    pub default_structure: UpgradeId,

    /// Armor upgrade selected on a fresh loadout
    pub default_armor: UpgradeId,

    /// Heat sink upgrade selected on a fresh loadout
    pub default_heat_sinks: UpgradeId,

    /// Missile guidance upgrade selected on a fresh loadout
    pub default_guidance: UpgradeId,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            history_depth: 128,
            default_structure: UpgradeId::from("standard-structure"),
            default_armor: UpgradeId::from("standard-armor"),
            default_heat_sinks: UpgradeId::from("single-heat-sinks"),
            default_guidance: UpgradeId::from("no-guidance"),
        }
    }
}

impl EditorConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EditorConfig = toml::from_str(content)?;
        config.validate().map_err(LoadoutError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config file from disk
    pub fn load_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.history_depth == 0 {
            return Err("history_depth must be at least 1".into());
        }

        let defaults = [
            ("default_structure", &self.default_structure),
            ("default_armor", &self.default_armor),
            ("default_heat_sinks", &self.default_heat_sinks),
            ("default_guidance", &self.default_guidance),
        ];
        for (name, id) in defaults {
            if id.0.trim().is_empty() {
                return Err(format!("{} must not be empty", name));
            }
        }

        Ok(())
    }
}
