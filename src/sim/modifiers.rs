//! Gameplay modifiers toggled by phase changes
//!
//! The rotation engine never touches the player, spawner or camera directly.
//! It goes through [`PhaseHooks`], which the composition root implements by
//! forwarding to the real collaborators.

use super::phase::Phase;

/// Outbound calls the phase subsystem makes into gameplay systems
pub trait PhaseHooks {
    // Player
    /// Current gravity orientation (read by the indicator to pick its height and flip)
    fn gravity_inverted(&self) -> bool;
    fn set_inverted_gravity(&mut self, inverted: bool);
    fn set_ice_mode(&mut self, enabled: bool);
    /// Switch to a random non-default player scale
    fn randomize_player_size(&mut self);
    fn reset_player_size(&mut self);

    // Obstacle spawner
    fn set_narrow_passages(&mut self, enabled: bool);
    fn set_moving_obstacles(&mut self, enabled: bool);
    fn set_angled_passages(&mut self, enabled: bool);

    // Camera
    fn start_camera_shake(&mut self);
    fn stop_camera_shake(&mut self);
}

/// Revert every modifier to its baseline value
pub fn clear_all<H: PhaseHooks + ?Sized>(hooks: &mut H) {
    hooks.set_inverted_gravity(false);
    hooks.set_ice_mode(false);
    hooks.reset_player_size();

    hooks.set_narrow_passages(false);
    hooks.set_moving_obstacles(false);
    hooks.set_angled_passages(false);

    hooks.stop_camera_shake();
}

/// Clear everything, then turn on exactly the modifiers `phase` calls for
pub fn apply_phase<H: PhaseHooks + ?Sized>(hooks: &mut H, phase: Phase) {
    clear_all(hooks);

    match phase {
        Phase::Classic => {}
        Phase::InvertedGravity => hooks.set_inverted_gravity(true),
        Phase::Ice => hooks.set_ice_mode(true),
        Phase::NarrowPassages => hooks.set_narrow_passages(true),
        Phase::Earthquake => hooks.start_camera_shake(),
        Phase::MovingObstacles => hooks.set_moving_obstacles(true),
        Phase::AngledPassages => hooks.set_angled_passages(true),
        Phase::PlayerSizeChange => hooks.randomize_player_size(),
    }
}

/// Snapshot of which modifiers are on. Used by tests and debug overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActiveModifiers {
    pub inverted_gravity: bool,
    pub ice_mode: bool,
    pub resized_player: bool,
    pub narrow_passages: bool,
    pub moving_obstacles: bool,
    pub angled_passages: bool,
    pub camera_shake: bool,
}

impl ActiveModifiers {
    /// Baseline: nothing active
    pub fn is_baseline(&self) -> bool {
        *self == Self::default()
    }

    /// Number of modifiers switched on
    pub fn count(&self) -> usize {
        [
            self.inverted_gravity,
            self.ice_mode,
            self.resized_player,
            self.narrow_passages,
            self.moving_obstacles,
            self.angled_passages,
            self.camera_shake,
        ]
        .iter()
        .filter(|on| **on)
        .count()
    }
}

/// Hooks that only record state, for exercising the engine without gameplay systems
#[derive(Debug, Clone, Default)]
pub struct RecordingHooks {
    pub active: ActiveModifiers,
    /// Number of setter calls received
    pub calls: usize,
}

impl PhaseHooks for RecordingHooks {
    fn gravity_inverted(&self) -> bool {
        self.active.inverted_gravity
    }

    fn set_inverted_gravity(&mut self, inverted: bool) {
        self.calls += 1;
        self.active.inverted_gravity = inverted;
    }

    fn set_ice_mode(&mut self, enabled: bool) {
        self.calls += 1;
        self.active.ice_mode = enabled;
    }

    fn randomize_player_size(&mut self) {
        self.calls += 1;
        self.active.resized_player = true;
    }

    fn reset_player_size(&mut self) {
        self.calls += 1;
        self.active.resized_player = false;
    }

    fn set_narrow_passages(&mut self, enabled: bool) {
        self.calls += 1;
        self.active.narrow_passages = enabled;
    }

    fn set_moving_obstacles(&mut self, enabled: bool) {
        self.calls += 1;
        self.active.moving_obstacles = enabled;
    }

    fn set_angled_passages(&mut self, enabled: bool) {
        self.calls += 1;
        self.active.angled_passages = enabled;
    }

    fn start_camera_shake(&mut self) {
        self.calls += 1;
        self.active.camera_shake = true;
    }

    fn stop_camera_shake(&mut self) {
        self.calls += 1;
        self.active.camera_shake = false;
    }
}
