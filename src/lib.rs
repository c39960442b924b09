//! Phase Flap - an endless side-scroller with rotating gameplay phases
//!
//! Core modules:
//! - `sim`: Deterministic simulation (phase rotation, background fades, indicator, collaborators)
//! - `settings`: Data-driven tuning, loaded from JSON
//! - `error`: Configuration errors

pub mod error;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{Settings, TimeBase};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta accepted before clamping (tab switch, debugger pause)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Slack used when comparing accumulated float time against a duration
    pub const TIME_EPSILON: f32 = 1e-5;

    /// Default seconds between phase rotations
    pub const PHASE_DURATION: f32 = 15.0;
    /// Seconds a stalled hazard gate waits before logging a diagnostic
    pub const HAZARD_WARN_AFTER: f32 = 10.0;
    /// Duration of each half of the background cross-fade
    pub const FADE_STAGE_DURATION: f32 = 0.5;

    /// Standard gravity used by the ice-mode fall boost
    pub const GRAVITY: f32 = 9.81;

    /// Maximum live trail particles
    pub const MAX_TRAIL_PARTICLES: usize = 256;
}

/// Clamp a value to [0, 1]
#[inline]
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Linear interpolation between `a` and `b`, with `t` clamped to [0, 1]
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * clamp01(t)
}
