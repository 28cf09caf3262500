//! Engine configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ticks::RANDOM_TICK_SAMPLE_SPACE;

/// Tunable engine parameters, loadable from a JSON file.
///
/// Unknown fields are rejected, missing fields fall back to their defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Random tick chance per position, out of 4096. Zero disables the tier.
    pub random_tick_speed: u32,
    /// Upper bound on nested block updates before the cascade is cut off.
    pub max_cascade_depth: u32,
    /// Upper bound on scheduled ticks fired per world tick.
    pub max_ticks_per_drain: u32,
    /// Seed for the engine's deterministic random streams.
    pub seed: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            random_tick_speed: 3,
            max_cascade_depth: 32,
            max_ticks_per_drain: 65_536,
            seed: 0,
        }
    }
}

impl EngineSettings {
    /// Loads settings from `path`, creating the file with defaults when it
    /// does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            let settings = Self::default();
            std::fs::write(path, serde_json::to_string_pretty(&settings)?)?;
            return Ok(settings);
        }

        let settings: Self = serde_json::from_str(&std::fs::read_to_string(path)?)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks every field against its supported range.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.random_tick_speed > RANDOM_TICK_SAMPLE_SPACE {
            return Err(SettingsError::Invalid {
                field: "random_tick_speed",
                reason: format!("must be at most {RANDOM_TICK_SAMPLE_SPACE}"),
            });
        }
        if self.max_cascade_depth == 0 || self.max_cascade_depth > 512 {
            return Err(SettingsError::Invalid {
                field: "max_cascade_depth",
                reason: "must be between 1 and 512".into(),
            });
        }
        if self.max_ticks_per_drain == 0 {
            return Err(SettingsError::Invalid {
                field: "max_ticks_per_drain",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}

/// Failure while loading or validating [`EngineSettings`].
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The settings file could not be read or written.
    #[error("failed to read or write settings file: {0}")]
    Io(#[from] std::io::Error),
    /// The settings file is not valid JSON for this schema.
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field is outside its supported range.
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Human readable constraint that was violated.
        reason: String,
    },
}
