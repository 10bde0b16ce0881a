//! Game settings loaded from a JSON document
//!
//! Every section is optional; missing fields fall back to their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sim::Rules;
use crate::tuning::Tuning;

/// How frame time turns into simulation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TimestepMode {
    /// Exactly one (gated) step per rendered frame
    #[default]
    PerFrame,
    /// Fixed-timestep accumulator, capped at `MAX_SUBSTEPS` per frame
    Accumulated,
}

/// Debug controls for the loop driver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugSettings {
    /// Global switch for simulation updates
    pub can_update: bool,
    /// Step only every Nth frame (1 = every frame)
    pub ticks_per_update: u32,
    /// Show the debug overlay
    pub gui_visible: bool,
    pub timestep: TimestepMode,
}

impl Default for DebugSettings {
    fn default() -> Self {
        Self {
            can_update: true,
            ticks_per_update: 1,
            gui_visible: false,
            timestep: TimestepMode::PerFrame,
        }
    }
}

/// Game settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,
    pub tuning: Tuning,
    pub rules: Rules,
    pub debug: DebugSettings,
}

impl Settings {
    /// Read, parse and validate a settings file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::info!("loading settings from '{}'", path.display());

        let json = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json_str(&json)?;

        log::info!("successfully loaded '{}'", path.display());
        Ok(settings)
    }

    /// Parse and validate a settings document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }

    /// Serialize for writing back to disk
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.debug.ticks_per_update == 0 {
            return Err(Error::InvalidSettings(
                "ticks_per_update must be at least 1".into(),
            ));
        }
        self.tuning.validate()
    }
}
