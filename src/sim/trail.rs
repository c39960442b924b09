//! Fire-and-forget trail particles
//!
//! Particles belong to the pool, not to whatever spawned them. Hiding or
//! resetting the indicator leaves live particles to finish fading on their own.

use std::collections::VecDeque;

use glam::Vec2;

use super::phase::Color;
use crate::consts::MAX_TRAIL_PARTICLES;

/// A single fading trail sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrailParticle {
    pub pos: Vec2,
    /// Drift velocity (world units per second)
    pub vel: Vec2,
    pub color: Color,
    pub elapsed: f32,
    pub lifetime: f32,
}

impl TrailParticle {
    pub fn new(pos: Vec2, vel: Vec2, color: Color, lifetime: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            elapsed: 0.0,
            lifetime,
        }
    }

    /// Opacity, fading linearly from 1 to 0 over the lifetime
    pub fn alpha(&self) -> f32 {
        if self.lifetime <= 0.0 {
            return 0.0;
        }
        crate::lerp(1.0, 0.0, self.elapsed / self.lifetime)
    }

    /// Color with the current fade applied
    pub fn tinted(&self) -> Color {
        self.color.with_alpha(self.color.a * self.alpha())
    }

    pub fn is_alive(&self) -> bool {
        self.elapsed < self.lifetime
    }

    fn update(&mut self, dt: f32) {
        self.elapsed += dt;
        self.pos += self.vel * dt;
    }
}

/// Pool of live trail particles
#[derive(Debug, Clone, Default)]
pub struct TrailParticles {
    particles: VecDeque<TrailParticle>,
}

impl TrailParticles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a particle. When the pool is full the oldest particle is dropped.
    pub fn spawn(&mut self, particle: TrailParticle) {
        if self.particles.len() >= MAX_TRAIL_PARTICLES {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Drift, fade and expire every particle
    pub fn tick(&mut self, dt: f32) {
        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(TrailParticle::is_alive);
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrailParticle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn particle() -> TrailParticle {
        TrailParticle::new(Vec2::ZERO, Vec2::new(-0.5, 0.0), Color::WHITE, 1.0)
    }

    #[test]
    fn test_particle_drifts_and_fades() {
        let mut pool = TrailParticles::new();
        pool.spawn(particle());
        pool.tick(0.5);

        let p = pool.iter().next().copied().unwrap();
        assert!((p.pos.x - -0.25).abs() < 1e-6);
        assert!((p.alpha() - 0.5).abs() < 1e-6);
        assert!((p.tinted().a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_particle_expires_after_lifetime() {
        let mut pool = TrailParticles::new();
        pool.spawn(particle());
        pool.tick(0.75);
        assert_eq!(pool.len(), 1);
        pool.tick(0.25);
        assert!(pool.is_empty());
    }

    #[test]
    fn test_pool_drops_oldest_when_full() {
        let mut pool = TrailParticles::new();
        for i in 0..MAX_TRAIL_PARTICLES + 3 {
            let mut p = particle();
            p.pos.y = i as f32;
            pool.spawn(p);
        }
        assert_eq!(pool.len(), MAX_TRAIL_PARTICLES);
        assert_eq!(pool.iter().next().map(|p| p.pos.y), Some(3.0));
        assert_eq!(
            pool.iter().last().map(|p| p.pos.y),
            Some((MAX_TRAIL_PARTICLES + 2) as f32)
        );
    }

    #[test]
    fn test_full_pool_keeps_spawn_order() {
        let mut pool = TrailParticles::new();
        for i in 0..MAX_TRAIL_PARTICLES * 2 {
            let mut p = particle();
            p.pos.y = i as f32;
            pool.spawn(p);
        }
        let ys: Vec<f32> = pool.iter().map(|p| p.pos.y).collect();
        let expected: Vec<f32> = (MAX_TRAIL_PARTICLES..MAX_TRAIL_PARTICLES * 2)
            .map(|i| i as f32)
            .collect();
        assert_eq!(ys, expected);
    }
}
