//! Game settings and tuning
//!
//! Every tunable lives here and can be overridden from a JSON file. Sections
//! missing from the file keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::camera::CameraSettings;
use crate::sim::flow::FlowSettings;
use crate::sim::indicator::{IndicatorSettings, Viewport};
use crate::sim::obstacles::ObstacleSettings;
use crate::sim::parallax::ParallaxSettings;
use crate::sim::phase::PhaseVisuals;
use crate::sim::player::PlayerSettings;
use crate::sim::rotation::RotationSettings;
use crate::sim::transition::TransitionSettings;

/// Clock a timed system runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TimeBase {
    /// Simulation time: stops while paused, follows the time scale
    #[default]
    Scaled,
    /// Real time: keeps running while paused
    Unscaled,
}

impl TimeBase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBase::Scaled => "Scaled",
            TimeBase::Unscaled => "Unscaled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "scaled" | "sim" => Some(TimeBase::Scaled),
            "unscaled" | "real" => Some(TimeBase::Unscaled),
            _ => None,
        }
    }
}

/// All game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed for every RNG stream in the simulation
    pub seed: u64,

    // === Phase subsystem ===
    pub rotation: RotationSettings,
    pub transition: TransitionSettings,
    pub indicator: IndicatorSettings,
    pub visuals: PhaseVisuals,

    // === Game flow ===
    pub flow: FlowSettings,

    // === World ===
    pub viewport: Viewport,
    pub parallax: ParallaxSettings,
    pub player: PlayerSettings,
    pub obstacles: ObstacleSettings,
    pub camera: CameraSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0x5EED,

            rotation: RotationSettings::default(),
            transition: TransitionSettings::default(),
            indicator: IndicatorSettings::default(),
            visuals: PhaseVisuals::default(),

            flow: FlowSettings::default(),

            viewport: Viewport::default(),
            parallax: ParallaxSettings::default(),
            player: PlayerSettings::default(),
            obstacles: ObstacleSettings::default(),
            camera: CameraSettings::default(),
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be a positive number, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be zero or more, got {value}")))
    }
}

fn unit(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be within [0, 1], got {value}")))
    }
}

impl Settings {
    /// Parse and validate settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Write settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("rotation.phase_duration", self.rotation.phase_duration)?;
        non_negative("rotation.hazard_warn_after", self.rotation.hazard_warn_after)?;
        positive("transition.stage_duration", self.transition.stage_duration)?;

        positive("indicator.fly_speed", self.indicator.fly_speed)?;
        positive("indicator.trail_interval", self.indicator.trail_interval)?;
        positive("indicator.trail_lifetime", self.indicator.trail_lifetime)?;
        non_negative("indicator.edge_margin", self.indicator.edge_margin)?;
        unit("indicator.normal_height", self.indicator.normal_height)?;
        unit("indicator.inverted_height", self.indicator.inverted_height)?;

        positive("flow.countdown_step_duration", self.flow.countdown_step_duration)?;

        positive("viewport.width", self.viewport.width)?;
        positive("viewport.height", self.viewport.height)?;

        non_negative("parallax.speed", self.parallax.speed)?;
        positive("parallax.tile_width", self.parallax.tile_width)?;
        if self.parallax.tiles_per_layer == 0 {
            return Err(ConfigError::invalid(
                "parallax.tiles_per_layer",
                "needs at least one tile",
            ));
        }
        if !(0.0..self.parallax.tile_width).contains(&self.parallax.overlap) {
            return Err(ConfigError::invalid(
                "parallax.overlap",
                "must be at least zero and smaller than a tile",
            ));
        }

        positive("player.small_scale", self.player.small_scale)?;
        positive("player.big_scale", self.player.big_scale)?;

        positive("obstacles.spawn_cooldown", self.obstacles.spawn_cooldown)?;
        positive("obstacles.default_gap", self.obstacles.default_gap)?;
        positive("obstacles.narrow_gap", self.obstacles.narrow_gap)?;
        non_negative("obstacles.vertical_range", self.obstacles.vertical_range)?;
        non_negative("obstacles.max_angle", self.obstacles.max_angle)?;

        non_negative("camera.shake_magnitude", self.camera.shake_magnitude)?;
        positive("camera.shake_frequency", self.camera.shake_frequency)?;

        Ok(())
    }
}
