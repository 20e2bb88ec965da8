use serde::Deserialize;

use crate::constants::{
    DEFAULT_LIGHT_PERIOD, DEFAULT_MOVE_SPEED, DEFAULT_SCENE_SIZE, MAX_MARCH_STEPS,
};
use crate::error::ConfigError;

/// Tunable scene and render settings, loaded from RON.
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Extents of the rendered scene window.
    pub scene_size: [u32; 3],
    pub light_position: [f32; 3],
    pub near_clip: f32,
    /// Degrees.
    pub field_of_view: f32,
    pub fog_distance: f32,
    /// Initial grey level of the fog, replaced on the first tick.
    pub fog_grey: f32,
    pub move_speed: f32,
    /// Time units per light revolution.
    pub light_period: f32,
    pub max_steps: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            scene_size: DEFAULT_SCENE_SIZE,
            light_position: [0.0, 1024.0, 0.0],
            near_clip: 0.01,
            field_of_view: 75.0,
            fog_distance: 256.0,
            fog_grey: 0.5,
            move_speed: DEFAULT_MOVE_SPEED,
            light_period: DEFAULT_LIGHT_PERIOD,
            max_steps: MAX_MARCH_STEPS,
        }
    }
}

impl Settings {
    /// Reject values the scene or kernel cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scene_size.contains(&0) {
            return Err(ConfigError::Invalid {
                field: "scene_size",
                reason: format!("every extent must be non-zero, got {:?}", self.scene_size),
            });
        }
        if self.max_steps == 0 {
            return Err(ConfigError::Invalid {
                field: "max_steps",
                reason: "the march needs at least one step".to_string(),
            });
        }
        if !(self.near_clip > 0.0) {
            return Err(ConfigError::Invalid {
                field: "near_clip",
                reason: format!("must be positive, got {}", self.near_clip),
            });
        }
        if !(self.field_of_view > 0.0 && self.field_of_view < 180.0) {
            return Err(ConfigError::Invalid {
                field: "field_of_view",
                reason: format!("must be in (0, 180) degrees, got {}", self.field_of_view),
            });
        }
        if !(self.fog_distance > 0.0) {
            return Err(ConfigError::Invalid {
                field: "fog_distance",
                reason: format!("must be positive, got {}", self.fog_distance),
            });
        }
        if !(self.light_period > 0.0) {
            return Err(ConfigError::Invalid {
                field: "light_period",
                reason: format!("must be positive, got {}", self.light_period),
            });
        }
        Ok(())
    }
}

/// Parse and validate settings from a RON string.
pub fn load_settings_from_str(ron_str: &str) -> Result<Settings, ConfigError> {
    let options = ron::Options::default();
    let settings: Settings = options
        .from_str(ron_str)
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    settings.validate()?;
    Ok(settings)
}
