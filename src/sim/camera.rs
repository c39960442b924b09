//! Camera shake for the earthquake phase

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Max offset from the rest position
    pub shake_magnitude: f32,
    /// New offsets per second
    pub shake_frequency: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            shake_magnitude: 0.2,
            shake_frequency: 20.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CameraShake {
    settings: CameraSettings,
    shaking: bool,
    offset: Vec2,
    since_roll: f32,
}

impl CameraShake {
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            settings,
            shaking: false,
            offset: Vec2::ZERO,
            since_roll: 0.0,
        }
    }

    /// Begin shaking. Ignored if already shaking.
    pub fn start(&mut self) {
        if self.shaking {
            return;
        }
        self.shaking = true;
        // Roll on the next tick
        self.since_roll = f32::INFINITY;
    }

    /// Stop and snap back to the rest position
    pub fn stop(&mut self) {
        self.shaking = false;
        self.offset = Vec2::ZERO;
        self.since_roll = 0.0;
    }

    pub fn tick<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        if !self.shaking {
            return;
        }
        self.since_roll += dt;
        let period = if self.settings.shake_frequency > 0.0 {
            1.0 / self.settings.shake_frequency
        } else {
            f32::INFINITY
        };
        if self.since_roll >= period {
            self.since_roll = 0.0;
            self.offset = random_in_unit_circle(rng) * self.settings.shake_magnitude;
        }
    }

    pub fn is_shaking(&self) -> bool {
        self.shaking
    }

    /// Offset to add to the camera's rest position
    pub fn offset(&self) -> Vec2 {
        self.offset
    }
}

fn random_in_unit_circle<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let radius = rng.random::<f32>().sqrt();
    Vec2::new(angle.cos(), angle.sin()) * radius
}
