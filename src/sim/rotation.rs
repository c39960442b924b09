//! Phase rotation engine
//!
//! Runs the endless phase cycle as an explicit state machine, one step per tick:
//!
//! 1. `Waiting` - count down `phase_duration`
//! 2. pick a new phase, different from the current one
//! 3. `Announcing` - indicator flies across the screen
//! 4. `AwaitingSafety` - hold until the player leaves the hazard region
//! 5. `Transitioning` - background cross-fade
//! 6. apply modifiers, then back to 1
//!
//! A reset tears down whatever step is in flight, snaps everything back to
//! Classic and restarts the cycle on the next tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::indicator::{IndicatorStatus, PhaseIndicator};
use super::modifiers::{self, PhaseHooks};
use super::parallax::ParallaxScroller;
use super::phase::Phase;
use super::timer::{FrameTime, Timer};
use super::trail::TrailParticles;
use super::transition::{BackgroundTransition, TransitionStatus};
use crate::consts::{HAZARD_WARN_AFTER, PHASE_DURATION};
use crate::settings::TimeBase;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationSettings {
    /// Seconds spent in a phase before the next one is announced
    pub phase_duration: f32,
    /// Seconds a blocked hazard gate waits before logging a warning
    pub hazard_warn_after: f32,
    /// Clock the cycle runs on
    pub time_base: TimeBase,
}

impl Default for RotationSettings {
    fn default() -> Self {
        Self {
            phase_duration: PHASE_DURATION,
            hazard_warn_after: HAZARD_WARN_AFTER,
            time_base: TimeBase::Scaled,
        }
    }
}

/// Orchestration state visible to the rest of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationState {
    pub current_phase: Phase,
    /// Player is inside the hazard region. Written only by hazard notifications.
    pub hazard_active: bool,
    /// A rotation cycle is running
    pub cycle_pending: bool,
}

/// How long the hazard gate has been blocking
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stall {
    pub seconds: f32,
    pub warned: bool,
}

/// Where the cycle currently is
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RotationStep {
    /// Not started
    Idle,
    /// Reset applied; a fresh cycle starts on the next tick. That tick only
    /// arms the wait timer, so the first wait after a reset is one tick longer
    /// than `phase_duration`.
    Restarting,
    Waiting { timer: Timer },
    Announcing { next: Phase },
    AwaitingSafety { next: Phase, stall: Stall },
    Transitioning { next: Phase },
    /// Background already swapped, hazard re-entered before modifiers could apply
    Settling { next: Phase, stall: Stall },
}

impl RotationStep {
    /// Phase selected for the cycle in flight, if one has been picked
    pub fn next_phase(&self) -> Option<Phase> {
        match *self {
            RotationStep::Announcing { next }
            | RotationStep::AwaitingSafety { next, .. }
            | RotationStep::Transitioning { next }
            | RotationStep::Settling { next, .. } => Some(next),
            RotationStep::Idle | RotationStep::Restarting | RotationStep::Waiting { .. } => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RotationStep::Idle => "idle",
            RotationStep::Restarting => "restarting",
            RotationStep::Waiting { .. } => "waiting",
            RotationStep::Announcing { .. } => "announcing",
            RotationStep::AwaitingSafety { .. } => "awaiting-safety",
            RotationStep::Transitioning { .. } => "transitioning",
            RotationStep::Settling { .. } => "settling",
        }
    }
}

/// Notable things that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationEvent {
    /// A new phase was picked and its announcement started
    Announced(Phase),
    /// Modifiers for the phase are now active
    Applied { from: Phase, to: Phase },
}

/// The phase orchestrator. Owns the indicator, the background transition and
/// the hooks into gameplay systems.
#[derive(Debug)]
pub struct PhaseRotation<H: PhaseHooks> {
    settings: RotationSettings,
    state: RotationState,
    step: RotationStep,
    rng: Pcg32,
    indicator: PhaseIndicator,
    transition: BackgroundTransition,
    hooks: H,
    cycles_completed: u64,
}

impl<H: PhaseHooks> PhaseRotation<H> {
    pub fn new(
        settings: RotationSettings,
        indicator: PhaseIndicator,
        transition: BackgroundTransition,
        hooks: H,
        seed: u64,
    ) -> Self {
        Self {
            settings,
            state: RotationState::default(),
            step: RotationStep::Idle,
            rng: Pcg32::seed_from_u64(seed),
            indicator,
            transition,
            hooks,
            cycles_completed: 0,
        }
    }

    /// Start the endless cycle. Once started it repeats on every tick until
    /// reset; calling this again is a no-op.
    pub fn start(&mut self) {
        if self.step == RotationStep::Idle {
            self.begin_cycle();
        }
    }

    fn begin_cycle(&mut self) {
        self.state.cycle_pending = true;
        self.step = RotationStep::Waiting {
            timer: Timer::new(self.settings.phase_duration),
        };
        log::debug!(
            "Phase cycle started, next rotation in {:.1}s",
            self.settings.phase_duration
        );
    }

    /// Hazard-zone notification from the collision system
    pub fn on_hazard_zone_changed(&mut self, entered: bool) {
        self.state.hazard_active = entered;
    }

    /// Abort the cycle in flight and return to Classic.
    ///
    /// Hides the indicator, cancels any fade, clears all modifiers and shows the
    /// Classic background instantly. The new cycle starts on the next tick.
    /// Calling this again before that tick does nothing.
    pub fn reset_to_baseline(&mut self, scroller: &mut ParallaxScroller) {
        if self.step == RotationStep::Restarting {
            log::debug!("Reset requested while already resetting, ignoring");
            return;
        }

        let aborted = self.step.name();
        self.indicator.hide_instant();
        self.transition.cancel();
        modifiers::clear_all(&mut self.hooks);

        self.state.current_phase = Phase::Classic;
        self.state.cycle_pending = false;
        self.transition.set_instant(Phase::Classic, scroller);

        self.step = RotationStep::Restarting;
        log::info!("Phase rotation reset to Classic (aborted while {aborted})");
    }

    /// Advance the cycle by one tick
    pub fn tick(
        &mut self,
        time: FrameTime,
        scroller: &mut ParallaxScroller,
        particles: &mut TrailParticles,
    ) -> Option<RotationEvent> {
        let dt = time.delta(self.settings.time_base);

        match self.step {
            RotationStep::Idle => None,
            RotationStep::Restarting => {
                self.begin_cycle();
                None
            }
            RotationStep::Waiting { mut timer } => {
                if !timer.tick(dt) {
                    self.step = RotationStep::Waiting { timer };
                    return None;
                }
                let next = Phase::random_other(self.state.current_phase, &mut self.rng);
                let inverted = self.hooks.gravity_inverted();
                self.indicator.announce(next, inverted, particles);
                self.step = RotationStep::Announcing { next };
                log::info!("Next phase: {next}");
                Some(RotationEvent::Announced(next))
            }
            RotationStep::Announcing { next } => {
                match self.indicator.tick(dt, particles) {
                    IndicatorStatus::Flying => {}
                    IndicatorStatus::Completed | IndicatorStatus::Hidden => {
                        self.step = RotationStep::AwaitingSafety {
                            next,
                            stall: Stall::default(),
                        };
                    }
                }
                None
            }
            RotationStep::AwaitingSafety { next, mut stall } => {
                if self.state.hazard_active {
                    self.note_stall(&mut stall, dt, next);
                    self.step = RotationStep::AwaitingSafety { next, stall };
                    return None;
                }
                self.transition.transition_to(next, scroller);
                self.step = RotationStep::Transitioning { next };
                None
            }
            RotationStep::Transitioning { next } => match self.transition.tick(dt, scroller) {
                TransitionStatus::Running => None,
                TransitionStatus::Finished | TransitionStatus::Idle => {
                    if self.state.hazard_active {
                        self.step = RotationStep::Settling {
                            next,
                            stall: Stall::default(),
                        };
                        return None;
                    }
                    Some(self.apply(next))
                }
            },
            RotationStep::Settling { next, mut stall } => {
                if self.state.hazard_active {
                    self.note_stall(&mut stall, dt, next);
                    self.step = RotationStep::Settling { next, stall };
                    return None;
                }
                Some(self.apply(next))
            }
        }
    }

    fn note_stall(&self, stall: &mut Stall, dt: f32, next: Phase) {
        stall.seconds += dt;
        if !stall.warned && stall.seconds >= self.settings.hazard_warn_after {
            stall.warned = true;
            log::warn!(
                "Hazard gate blocking phase {next} for {:.1}s; is the hazard notification wired?",
                stall.seconds
            );
        }
    }

    fn apply(&mut self, next: Phase) -> RotationEvent {
        debug_assert!(!self.state.hazard_active);
        let from = self.state.current_phase;
        modifiers::apply_phase(&mut self.hooks, next);
        self.state.current_phase = next;
        self.cycles_completed += 1;
        self.step = RotationStep::Waiting {
            timer: Timer::new(self.settings.phase_duration),
        };
        log::info!("Phase changed: {from} -> {next}");
        RotationEvent::Applied { from, to: next }
    }

    pub fn state(&self) -> RotationState {
        self.state
    }

    pub fn current_phase(&self) -> Phase {
        self.state.current_phase
    }

    pub fn is_hazard_active(&self) -> bool {
        self.state.hazard_active
    }

    pub fn step(&self) -> RotationStep {
        self.step
    }

    /// Phase announced for the cycle in flight
    pub fn pending_phase(&self) -> Option<Phase> {
        self.step.next_phase()
    }

    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    pub fn indicator(&self) -> &PhaseIndicator {
        &self.indicator
    }

    pub fn transition(&self) -> &BackgroundTransition {
        &self.transition
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn settings(&self) -> &RotationSettings {
        &self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::indicator::{IndicatorSettings, Viewport};
    use crate::sim::modifiers::RecordingHooks;
    use crate::sim::parallax::{LayerRole, ParallaxSettings};
    use crate::sim::phase::PhaseVisuals;
    use crate::sim::transition::TransitionSettings;
    use proptest::prelude::*;

    struct Rig {
        rotation: PhaseRotation<RecordingHooks>,
        scroller: ParallaxScroller,
        particles: TrailParticles,
    }

    impl Rig {
        fn new(seed: u64) -> Self {
            let visuals = PhaseVisuals::default();
            // No edge margin: flight is exactly 10 / 5 = 2s
            let indicator = PhaseIndicator::new(
                IndicatorSettings {
                    edge_margin: 0.0,
                    ..Default::default()
                },
                Viewport::default(),
                visuals.clone(),
            );
            let transition = BackgroundTransition::new(TransitionSettings::default(), visuals.clone());
            let mut rotation = PhaseRotation::new(
                RotationSettings::default(),
                indicator,
                transition,
                RecordingHooks::default(),
                seed,
            );
            rotation.start();
            Self {
                rotation,
                scroller: ParallaxScroller::new(
                    ParallaxSettings::default(),
                    visuals.background(Phase::Classic),
                ),
                particles: TrailParticles::new(),
            }
        }

        fn tick(&mut self, dt: f32) -> Option<RotationEvent> {
            self.rotation
                .tick(FrameTime::uniform(dt), &mut self.scroller, &mut self.particles)
        }

        fn tick_n(&mut self, n: usize, dt: f32) -> Vec<RotationEvent> {
            (0..n).filter_map(|_| self.tick(dt)).collect()
        }

        fn reset(&mut self) {
            self.rotation.reset_to_baseline(&mut self.scroller);
        }
    }

    #[test]
    fn test_idle_until_started() {
        let visuals = PhaseVisuals::default();
        let mut rotation = PhaseRotation::new(
            RotationSettings::default(),
            PhaseIndicator::new(IndicatorSettings::default(), Viewport::default(), visuals.clone()),
            BackgroundTransition::new(TransitionSettings::default(), visuals.clone()),
            RecordingHooks::default(),
            1,
        );
        let mut scroller = ParallaxScroller::new(ParallaxSettings::default(), visuals.background(Phase::Classic));
        let mut particles = TrailParticles::new();
        for _ in 0..100 {
            assert!(rotation.tick(FrameTime::uniform(1.0), &mut scroller, &mut particles).is_none());
        }
        assert_eq!(rotation.step(), RotationStep::Idle);
        assert!(!rotation.state().cycle_pending);

        rotation.start();
        assert!(rotation.state().cycle_pending);
        assert_eq!(rotation.step().name(), "waiting");
    }

    #[test]
    fn test_new_phase_announced_after_phase_duration() {
        let mut rig = Rig::new(3);
        assert!(rig.tick_n(14, 1.0).is_empty());
        let events = rig.tick_n(1, 1.0);
        let &[RotationEvent::Announced(next)] = events.as_slice() else {
            panic!("expected an announcement, got {events:?}");
        };
        assert_ne!(next, Phase::Classic);
        assert_eq!(rig.rotation.pending_phase(), Some(next));
        assert!(rig.rotation.indicator().is_visible());
        // Nothing applied yet
        assert!(rig.rotation.hooks().active.is_baseline());
        assert_eq!(rig.rotation.current_phase(), Phase::Classic);
    }

    #[test]
    fn test_full_cycle_timing() {
        let mut rig = Rig::new(5);
        // 15s wait at 0.5s ticks
        let events = rig.tick_n(30, 0.5);
        assert!(matches!(events.as_slice(), [RotationEvent::Announced(_)]));
        let next = rig.rotation.pending_phase().unwrap();

        // 2s flight
        rig.tick_n(3, 0.5);
        assert!(rig.rotation.indicator().is_visible());
        rig.tick(0.5);
        assert!(!rig.rotation.indicator().is_visible());
        assert_eq!(rig.rotation.step().name(), "awaiting-safety");

        // Gate open: transition starts
        rig.tick(0.5);
        assert!(rig.rotation.transition().is_running());

        // Two 0.5s stages
        assert!(rig.tick(0.5).is_none());
        let applied = rig.tick(0.5);
        assert_eq!(
            applied,
            Some(RotationEvent::Applied {
                from: Phase::Classic,
                to: next
            })
        );
        assert_eq!(rig.rotation.current_phase(), next);
        assert_eq!(
            rig.scroller.layer(LayerRole::Front).sprite,
            PhaseVisuals::default().background(next)
        );
        assert_eq!(rig.rotation.cycles_completed(), 1);
        assert_eq!(rig.rotation.step().name(), "waiting");
    }

    #[test]
    fn test_hazard_holds_cycle_before_transition() {
        let mut rig = Rig::new(8);
        rig.tick_n(30, 0.5);
        rig.rotation.on_hazard_zone_changed(true);
        rig.tick_n(4, 0.5);
        assert_eq!(rig.rotation.step().name(), "awaiting-safety");

        let calls_before = rig.rotation.hooks().calls;
        let front_before = rig.scroller.front_slot();
        assert!(rig.tick_n(200, 0.5).is_empty());
        assert_eq!(rig.rotation.hooks().calls, calls_before);
        assert_eq!(rig.scroller.front_slot(), front_before);
        assert!(!rig.rotation.transition().is_running());
        match rig.rotation.step() {
            RotationStep::AwaitingSafety { stall, .. } => {
                assert!((stall.seconds - 100.0).abs() < 1e-3);
                assert!(stall.warned);
            }
            other => panic!("unexpected step {other:?}"),
        }

        rig.rotation.on_hazard_zone_changed(false);
        rig.tick(0.5);
        assert_eq!(rig.rotation.step().name(), "transitioning");
        let events = rig.tick_n(2, 0.5);
        assert!(matches!(events.as_slice(), [RotationEvent::Applied { .. }]));
    }

    #[test]
    fn test_hazard_during_fade_defers_modifiers() {
        let mut rig = Rig::new(9);
        rig.tick_n(35, 0.5);
        assert_eq!(rig.rotation.step().name(), "transitioning");

        rig.rotation.on_hazard_zone_changed(true);
        let calls_before = rig.rotation.hooks().calls;
        assert!(rig.tick_n(2, 0.5).is_empty());
        assert_eq!(rig.rotation.step().name(), "settling");
        // Background swapped, modifiers untouched
        assert!(!rig.rotation.transition().is_running());
        assert_eq!(rig.rotation.hooks().calls, calls_before);
        assert_eq!(rig.rotation.current_phase(), Phase::Classic);

        rig.tick_n(10, 0.5);
        assert_eq!(rig.rotation.hooks().calls, calls_before);

        rig.rotation.on_hazard_zone_changed(false);
        let event = rig.tick(0.5);
        assert!(matches!(event, Some(RotationEvent::Applied { .. })));
    }

    #[test]
    fn test_reset_during_each_step() {
        // Tick counts that land in: waiting, announcing, awaiting-safety, transitioning, settled
        for ticks in [5, 31, 34, 36, 40] {
            let mut rig = Rig::new(21);
            rig.rotation.on_hazard_zone_changed(ticks == 34);
            rig.tick_n(ticks, 0.5);
            rig.reset();

            assert_eq!(rig.rotation.current_phase(), Phase::Classic, "ticks={ticks}");
            assert!(rig.rotation.hooks().active.is_baseline());
            assert!(!rig.rotation.indicator().is_visible());
            assert!(!rig.rotation.transition().is_running());
            assert!(!rig.rotation.state().cycle_pending);
            assert_eq!(rig.rotation.step(), RotationStep::Restarting);
            assert_eq!(rig.rotation.is_hazard_active(), ticks == 34);

            let classic = PhaseVisuals::default().background(Phase::Classic);
            for role in [LayerRole::Front, LayerRole::Back] {
                assert_eq!(rig.scroller.layer(role).sprite, classic);
                assert_eq!(rig.scroller.layer(role).alpha, 1.0);
            }

            rig.tick(0.5);
            assert!(rig.rotation.state().cycle_pending);
            match rig.rotation.step() {
                RotationStep::Waiting { timer } => assert_eq!(timer.elapsed(), 0.0),
                other => panic!("unexpected step {other:?}"),
            }
        }
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut rig = Rig::new(4);
        rig.tick_n(32, 0.5);
        rig.reset();
        let calls = rig.rotation.hooks().calls;
        let scroller = rig.scroller.clone();

        rig.reset();
        rig.reset();
        assert_eq!(rig.rotation.hooks().calls, calls);
        assert_eq!(rig.scroller, scroller);
        assert_eq!(rig.rotation.step(), RotationStep::Restarting);
    }

    #[test]
    fn test_cycle_restarts_fully_after_reset() {
        let mut rig = Rig::new(12);
        rig.tick_n(33, 0.5);
        rig.reset();
        // Restart tick, then a full 15s wait before the next announcement
        rig.tick(0.5);
        assert!(rig.tick_n(29, 0.5).is_empty());
        let events = rig.tick_n(1, 0.5);
        assert!(matches!(events.as_slice(), [RotationEvent::Announced(_)]));
    }

    #[test]
    fn test_unscaled_time_base_ignores_pause() {
        let visuals = PhaseVisuals::default();
        let settings = RotationSettings {
            time_base: TimeBase::Unscaled,
            ..Default::default()
        };
        let mut rotation = PhaseRotation::new(
            settings,
            PhaseIndicator::new(IndicatorSettings::default(), Viewport::default(), visuals.clone()),
            BackgroundTransition::new(TransitionSettings::default(), visuals.clone()),
            RecordingHooks::default(),
            2,
        );
        rotation.start();
        let mut scroller = ParallaxScroller::new(ParallaxSettings::default(), visuals.background(Phase::Classic));
        let mut particles = TrailParticles::new();
        let paused = FrameTime {
            scaled: 0.0,
            unscaled: 1.0,
        };
        let mut announced = false;
        for _ in 0..15 {
            announced |= rotation.tick(paused, &mut scroller, &mut particles).is_some();
        }
        assert!(announced);
    }

    #[test]
    fn test_scaled_time_base_freezes_while_paused() {
        let mut rig = Rig::new(2);
        let paused = FrameTime {
            scaled: 0.0,
            unscaled: 1.0,
        };
        for _ in 0..100 {
            assert!(
                rig.rotation
                    .tick(paused, &mut rig.scroller, &mut rig.particles)
                    .is_none()
            );
        }
        assert_eq!(rig.rotation.step().name(), "waiting");
    }

    proptest! {
        #[test]
        fn prop_consecutive_phases_differ(seed in any::<u64>()) {
            let mut rig = Rig::new(seed);
            let mut previous = Phase::Classic;
            let mut applied = 0;
            for _ in 0..2_000 {
                if let Some(RotationEvent::Applied { from, to }) = rig.tick(1.0) {
                    prop_assert_eq!(from, previous);
                    prop_assert_ne!(to, previous);
                    previous = to;
                    applied += 1;
                }
            }
            prop_assert!(applied > 50);
        }

        #[test]
        fn prop_reset_anywhere_restores_baseline(
            ticks in 0usize..120,
            hazard_toggles in prop::collection::vec(0usize..120, 0..6),
            seed in any::<u64>(),
        ) {
            let mut rig = Rig::new(seed);
            for i in 0..ticks {
                if hazard_toggles.contains(&i) {
                    let active = rig.rotation.is_hazard_active();
                    rig.rotation.on_hazard_zone_changed(!active);
                }
                rig.tick(0.5);
            }
            let hazard = rig.rotation.is_hazard_active();
            rig.reset();
            rig.tick(0.5);

            prop_assert_eq!(rig.rotation.current_phase(), Phase::Classic);
            prop_assert!(rig.rotation.hooks().active.is_baseline());
            prop_assert_eq!(rig.rotation.is_hazard_active(), hazard);
            prop_assert!(rig.rotation.state().cycle_pending);
            prop_assert!(!rig.rotation.indicator().is_visible());
            prop_assert!(!rig.rotation.transition().is_running());
        }

        #[test]
        fn prop_hazard_blocks_modifiers(seed in any::<u64>(), enter_at in 0usize..40) {
            let mut rig = Rig::new(seed);
            rig.tick_n(enter_at, 0.5);
            rig.rotation.on_hazard_zone_changed(true);
            let calls = rig.rotation.hooks().calls;
            let phase = rig.rotation.current_phase();
            for _ in 0..500 {
                let applied = matches!(rig.tick(0.5), Some(RotationEvent::Applied { .. }));
                prop_assert!(!applied, "modifiers applied while the hazard was active");
            }
            prop_assert_eq!(rig.rotation.hooks().calls, calls);
            prop_assert_eq!(rig.rotation.current_phase(), phase);
        }
    }
}
