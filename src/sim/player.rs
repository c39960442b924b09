//! Player modifiers: gravity orientation, ice physics and scale
//!
//! Holds the player-side values the phase modifiers change. Movement
//! integration itself lives in the physics layer, which reads these.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::GRAVITY;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Upward jump speed
    pub jump_force: f32,
    /// Rigidbody gravity scale under normal gravity
    pub gravity_scale: f32,
    /// Rigidbody gravity scale when inverted
    pub inverted_gravity_scale: f32,
    /// Extra fall acceleration multiplier in ice mode
    pub ice_fall_multiplier: f32,
    /// Jump multiplier in ice mode
    pub ice_jump_multiplier: f32,
    pub small_scale: f32,
    pub big_scale: f32,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            jump_force: 5.0,
            gravity_scale: 3.0,
            inverted_gravity_scale: -2.0,
            ice_fall_multiplier: 1.4,
            ice_jump_multiplier: 0.8,
            small_scale: 0.7,
            big_scale: 1.3,
        }
    }
}

/// Size variants picked by the size-change phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSize {
    Default,
    Small,
    Big,
}

#[derive(Debug, Clone)]
pub struct Player {
    settings: PlayerSettings,
    inverted_gravity: bool,
    ice_mode: bool,
    size: PlayerSize,
    rng: Pcg32,
}

impl Player {
    pub fn new(settings: PlayerSettings, seed: u64) -> Self {
        Self {
            settings,
            inverted_gravity: false,
            ice_mode: false,
            size: PlayerSize::Default,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn set_inverted_gravity(&mut self, inverted: bool) {
        self.inverted_gravity = inverted;
    }

    pub fn inverted_gravity(&self) -> bool {
        self.inverted_gravity
    }

    pub fn set_ice_mode(&mut self, enabled: bool) {
        self.ice_mode = enabled;
    }

    pub fn ice_mode(&self) -> bool {
        self.ice_mode
    }

    /// Pick small or big with equal odds. Never the default size.
    pub fn randomize_size(&mut self) {
        self.size = if self.rng.random_bool(0.5) {
            PlayerSize::Small
        } else {
            PlayerSize::Big
        };
    }

    pub fn reset_size(&mut self) {
        self.size = PlayerSize::Default;
    }

    pub fn size(&self) -> PlayerSize {
        self.size
    }

    /// Gravity scale for the physics body
    pub fn gravity_scale(&self) -> f32 {
        if self.inverted_gravity {
            self.settings.inverted_gravity_scale
        } else {
            self.settings.gravity_scale
        }
    }

    /// Sprite scale, mirrored vertically under inverted gravity
    pub fn scale(&self) -> Vec2 {
        let s = match self.size {
            PlayerSize::Default => 1.0,
            PlayerSize::Small => self.settings.small_scale,
            PlayerSize::Big => self.settings.big_scale,
        };
        let flip = if self.inverted_gravity { -1.0 } else { 1.0 };
        Vec2::new(s, s * flip)
    }

    /// Velocity set on a flap
    pub fn jump_velocity(&self) -> Vec2 {
        let mut force = self.settings.jump_force;
        if self.ice_mode {
            force *= self.settings.ice_jump_multiplier;
        }
        let dir = if self.inverted_gravity { -1.0 } else { 1.0 };
        Vec2::new(0.0, force * dir)
    }

    /// Extra downward velocity added per physics step in ice mode
    pub fn fall_boost(&self, dt: f32) -> Vec2 {
        if !self.ice_mode {
            return Vec2::ZERO;
        }
        let boost = GRAVITY * (self.settings.ice_fall_multiplier - 1.0) * dt;
        Vec2::new(0.0, -boost)
    }

    /// Restore every modifier (run restart)
    pub fn reset(&mut self) {
        self.inverted_gravity = false;
        self.ice_mode = false;
        self.size = PlayerSize::Default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inverted_gravity_flips_scale_and_jump() {
        let mut player = Player::new(PlayerSettings::default(), 1);
        assert_eq!(player.gravity_scale(), 3.0);
        assert_eq!(player.jump_velocity(), Vec2::new(0.0, 5.0));

        player.set_inverted_gravity(true);
        assert_eq!(player.gravity_scale(), -2.0);
        assert_eq!(player.scale(), Vec2::new(1.0, -1.0));
        assert_eq!(player.jump_velocity(), Vec2::new(0.0, -5.0));
    }

    #[test]
    fn test_ice_mode_weakens_jump_and_boosts_fall() {
        let mut player = Player::new(PlayerSettings::default(), 1);
        assert_eq!(player.fall_boost(1.0), Vec2::ZERO);

        player.set_ice_mode(true);
        assert!((player.jump_velocity().y - 4.0).abs() < 1e-5);
        let boost = player.fall_boost(0.5);
        assert!((boost.y - -(9.81 * 0.4 * 0.5)).abs() < 1e-4);
    }

    #[test]
    fn test_random_size_is_never_default() {
        let mut player = Player::new(PlayerSettings::default(), 99);
        let mut seen_small = false;
        let mut seen_big = false;
        for _ in 0..100 {
            player.randomize_size();
            match player.size() {
                PlayerSize::Small => seen_small = true,
                PlayerSize::Big => seen_big = true,
                PlayerSize::Default => panic!("random size picked the default"),
            }
        }
        assert!(seen_small && seen_big);

        player.reset_size();
        assert_eq!(player.scale(), Vec2::ONE);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut player = Player::new(PlayerSettings::default(), 5);
        player.set_inverted_gravity(true);
        player.set_ice_mode(true);
        player.randomize_size();
        player.reset();
        assert!(!player.inverted_gravity());
        assert!(!player.ice_mode());
        assert_eq!(player.size(), PlayerSize::Default);
    }
}
