//! Explicit timers and the frame clock
//!
//! Nothing in the simulation reads wall-clock time. Every timer is advanced
//! by the delta it is handed, so tests drive time by calling `tick` directly.

use serde::{Deserialize, Serialize};

use crate::consts::TIME_EPSILON;
use crate::settings::TimeBase;

/// Countdown timer advanced by explicit deltas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Timer {
    duration: f32,
    elapsed: f32,
}

impl Timer {
    pub fn new(duration: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` seconds. Returns true once the duration has been reached.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.elapsed += dt.max(0.0);
        self.is_finished()
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed + TIME_EPSILON >= self.duration
    }

    /// Progress in [0, 1]
    pub fn ratio(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        crate::clamp01(self.elapsed / self.duration)
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn remaining(&self) -> f32 {
        (self.duration - self.elapsed).max(0.0)
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }
}

/// Deltas for one simulation step in both time bases
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Affected by pause and time scale
    pub scaled: f32,
    /// Real elapsed time
    pub unscaled: f32,
}

impl FrameTime {
    /// Same delta in both bases (unpaused, scale 1)
    pub fn uniform(dt: f32) -> Self {
        Self {
            scaled: dt,
            unscaled: dt,
        }
    }

    pub fn delta(&self, base: TimeBase) -> f32 {
        match base {
            TimeBase::Scaled => self.scaled,
            TimeBase::Unscaled => self.unscaled,
        }
    }
}

/// Game clock: converts real step deltas into scaled simulation deltas
#[derive(Debug, Clone, PartialEq)]
pub struct GameClock {
    paused: bool,
    time_scale: f32,
    scaled_total: f64,
    unscaled_total: f64,
}

impl Default for GameClock {
    fn default() -> Self {
        Self {
            paused: false,
            time_scale: 1.0,
            scaled_total: 0.0,
            unscaled_total: 0.0,
        }
    }
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, dt: f32) -> FrameTime {
        let unscaled = dt.max(0.0);
        let scaled = if self.paused {
            0.0
        } else {
            unscaled * self.time_scale
        };
        self.scaled_total += f64::from(scaled);
        self.unscaled_total += f64::from(unscaled);
        FrameTime { scaled, unscaled }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Total scaled seconds since creation
    pub fn scaled_seconds(&self) -> f64 {
        self.scaled_total
    }

    /// Total real seconds since creation
    pub fn unscaled_seconds(&self) -> f64 {
        self.unscaled_total
    }
}
