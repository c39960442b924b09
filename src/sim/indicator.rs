//! Phase announcement indicator
//!
//! Flies an icon across the viewport, left to right, at a fixed height while
//! dropping colored trail particles. The flight finishing is the signal the
//! rotation engine waits on before moving to the hazard gate.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::phase::{Color, Phase, PhaseVisuals};
use super::trail::{TrailParticle, TrailParticles};

/// Visible world area, centered on the origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 10.0,
            height: 10.0,
        }
    }
}

impl Viewport {
    /// World point for a normalized viewport coordinate (0,0 bottom-left, 1,1 top-right)
    pub fn to_world(&self, normalized: Vec2) -> Vec2 {
        Vec2::new(
            (normalized.x - 0.5) * self.width,
            (normalized.y - 0.5) * self.height,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    /// Horizontal speed (world units per second)
    pub fly_speed: f32,
    /// Seconds between trail particles
    pub trail_interval: f32,
    /// Seconds each trail particle lives
    pub trail_lifetime: f32,
    /// Trail particle drift velocity
    pub trail_drift: Vec2,
    /// Trail spawn point relative to the icon (mirrored vertically when flipped)
    pub trail_offset: Vec2,
    /// How far outside each viewport edge the flight starts and ends, as a fraction of width
    pub edge_margin: f32,
    /// Normalized flight height under normal gravity
    pub normal_height: f32,
    /// Normalized flight height under inverted gravity
    pub inverted_height: f32,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            fly_speed: 5.0,
            trail_interval: 0.1,
            trail_lifetime: 1.0,
            trail_drift: Vec2::new(-0.5, 0.0),
            trail_offset: Vec2::new(-0.3, 0.0),
            edge_margin: 0.1,
            normal_height: 0.8,
            inverted_height: 0.2,
        }
    }
}

/// Result of advancing the indicator by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorStatus {
    Hidden,
    Flying,
    /// The icon crossed the far edge this tick and is now hidden
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Flight {
    phase: Phase,
    pos: Vec2,
    end_x: f32,
    color: Color,
    flipped: bool,
    since_spawn: f32,
}

#[derive(Debug, Clone)]
pub struct PhaseIndicator {
    settings: IndicatorSettings,
    viewport: Viewport,
    visuals: PhaseVisuals,
    flight: Option<Flight>,
}

impl PhaseIndicator {
    pub fn new(settings: IndicatorSettings, viewport: Viewport, visuals: PhaseVisuals) -> Self {
        Self {
            settings,
            viewport,
            visuals,
            flight: None,
        }
    }

    /// Show the icon for `phase` and start its flight.
    ///
    /// Replaces any flight already in progress. The first trail particle is
    /// dropped immediately at the start position.
    pub fn announce(
        &mut self,
        phase: Phase,
        gravity_inverted: bool,
        particles: &mut TrailParticles,
    ) {
        let height = if gravity_inverted {
            self.settings.inverted_height
        } else {
            self.settings.normal_height
        };
        let margin = self.settings.edge_margin;
        let start = self.viewport.to_world(Vec2::new(-margin, height));
        let end = self.viewport.to_world(Vec2::new(1.0 + margin, height));

        let flight = Flight {
            phase,
            pos: start,
            end_x: end.x,
            color: self.visuals.trail_color(phase),
            flipped: gravity_inverted,
            since_spawn: 0.0,
        };
        self.spawn_trail(&flight, particles);
        self.flight = Some(flight);
        log::debug!("Announcing phase {phase}");
    }

    /// Hide immediately and stop spawning trail. Live particles are left alone.
    pub fn hide_instant(&mut self) {
        self.flight = None;
    }

    pub fn tick(&mut self, dt: f32, particles: &mut TrailParticles) -> IndicatorStatus {
        let Some(mut flight) = self.flight else {
            return IndicatorStatus::Hidden;
        };

        let dt = dt.max(0.0);
        flight.pos.x += self.settings.fly_speed * dt;
        if flight.pos.x >= flight.end_x {
            self.flight = None;
            return IndicatorStatus::Completed;
        }

        flight.since_spawn += dt;
        if self.settings.trail_interval > 0.0 {
            while flight.since_spawn >= self.settings.trail_interval {
                flight.since_spawn -= self.settings.trail_interval;
                self.spawn_trail(&flight, particles);
            }
        }

        self.flight = Some(flight);
        IndicatorStatus::Flying
    }

    fn spawn_trail(&self, flight: &Flight, particles: &mut TrailParticles) {
        let mut offset = self.settings.trail_offset;
        if flight.flipped {
            offset.y = -offset.y;
        }
        particles.spawn(TrailParticle::new(
            flight.pos + offset,
            self.settings.trail_drift,
            flight.color,
            self.settings.trail_lifetime,
        ));
    }

    /// Seconds a full flight takes at the configured speed
    pub fn flight_duration(&self) -> f32 {
        let path = self.viewport.width * (1.0 + 2.0 * self.settings.edge_margin);
        if self.settings.fly_speed <= 0.0 {
            return f32::INFINITY;
        }
        path / self.settings.fly_speed
    }

    pub fn is_visible(&self) -> bool {
        self.flight.is_some()
    }

    pub fn position(&self) -> Option<Vec2> {
        self.flight.map(|f| f.pos)
    }

    /// Vertical icon scale: -1 when mirrored for inverted gravity
    pub fn vertical_scale(&self) -> f32 {
        match self.flight {
            Some(f) if f.flipped => -1.0,
            _ => 1.0,
        }
    }

    pub fn color(&self) -> Option<Color> {
        self.flight.map(|f| f.color)
    }

    pub fn phase(&self) -> Option<Phase> {
        self.flight.map(|f| f.phase)
    }
}
