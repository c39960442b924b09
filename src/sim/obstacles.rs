//! Obstacle spawn rules
//!
//! Decides when obstacles spawn and with which parameters. Building the
//! actual geometry is left to the game layer.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::timer::Timer;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObstacleSettings {
    /// Seconds between spawns
    pub spawn_cooldown: f32,
    /// Max vertical offset of a spawn (either direction)
    pub vertical_range: f32,
    pub default_gap: f32,
    pub narrow_gap: f32,
    /// Max rotation in degrees when angled passages are on
    pub max_angle: f32,
    /// Oscillation amplitude when moving obstacles are on
    pub move_amplitude: f32,
    /// Oscillation angular speed (radians per second)
    pub move_speed: f32,
}

impl Default for ObstacleSettings {
    fn default() -> Self {
        Self {
            spawn_cooldown: 2.0,
            vertical_range: 1.5,
            default_gap: 2.2,
            narrow_gap: 1.3,
            max_angle: 10.0,
            move_amplitude: 0.4,
            move_speed: 1.0,
        }
    }
}

/// Vertical sine motion for a moving obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillation {
    pub amplitude: f32,
    pub speed: f32,
}

impl Oscillation {
    /// Vertical offset from the spawn height at `time` seconds
    pub fn offset_at(&self, time: f32) -> f32 {
        (time * self.speed).sin() * self.amplitude
    }
}

/// Parameters for one spawned obstacle pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObstacleSpawn {
    pub y_offset: f32,
    pub gap: f32,
    /// Rotation in degrees
    pub angle: f32,
    pub oscillation: Option<Oscillation>,
}

#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    settings: ObstacleSettings,
    cooldown: Timer,
    narrow_passages: bool,
    moving_obstacles: bool,
    angled_passages: bool,
}

impl ObstacleSpawner {
    pub fn new(settings: ObstacleSettings) -> Self {
        Self {
            settings,
            // Zero-length first cooldown: spawn on the first tick
            cooldown: Timer::new(0.0),
            narrow_passages: false,
            moving_obstacles: false,
            angled_passages: false,
        }
    }

    pub fn set_narrow_passages(&mut self, enabled: bool) {
        self.narrow_passages = enabled;
    }

    pub fn set_moving_obstacles(&mut self, enabled: bool) {
        self.moving_obstacles = enabled;
    }

    pub fn set_angled_passages(&mut self, enabled: bool) {
        self.angled_passages = enabled;
    }

    pub fn narrow_passages(&self) -> bool {
        self.narrow_passages
    }

    pub fn moving_obstacles(&self) -> bool {
        self.moving_obstacles
    }

    pub fn angled_passages(&self) -> bool {
        self.angled_passages
    }

    /// Current gap between top and bottom obstacle
    pub fn gap(&self) -> f32 {
        if self.narrow_passages {
            self.settings.narrow_gap
        } else {
            self.settings.default_gap
        }
    }

    /// Advance the cooldown; returns a spawn when it elapses
    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> Option<ObstacleSpawn> {
        if !self.cooldown.tick(dt) {
            return None;
        }
        self.cooldown = Timer::new(self.settings.spawn_cooldown);
        Some(self.roll(rng))
    }

    /// Roll parameters for a spawn under the current flags
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> ObstacleSpawn {
        let range = self.settings.vertical_range;
        let y_offset = if range > 0.0 {
            rng.random_range(-range..range)
        } else {
            0.0
        };
        let max_angle = self.settings.max_angle;
        let angle = if self.angled_passages && max_angle > 0.0 {
            rng.random_range(-max_angle..max_angle)
        } else {
            0.0
        };
        let oscillation = self.moving_obstacles.then_some(Oscillation {
            amplitude: self.settings.move_amplitude,
            speed: self.settings.move_speed,
        });
        ObstacleSpawn {
            y_offset,
            gap: self.gap(),
            angle,
            oscillation,
        }
    }

    /// Restore defaults and restart the cooldown (run restart)
    pub fn reset(&mut self) {
        self.narrow_passages = false;
        self.moving_obstacles = false;
        self.angled_passages = false;
        self.cooldown = Timer::new(0.0);
    }
}
