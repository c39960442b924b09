//! Background cross-fade between the two parallax layers
//!
//! A fade runs in two stages of equal length: the front layer fades out, then
//! the back layer (now holding the new sprite) fades in. Both layers are near
//! transparent around the midpoint. When the second stage ends the layers swap
//! roles, so the next fade starts from the opposite physical layer.

use serde::{Deserialize, Serialize};

use super::parallax::{LayerRole, ParallaxScroller};
use super::phase::{Phase, PhaseVisuals, SpriteId};
use crate::consts::{FADE_STAGE_DURATION, TIME_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionSettings {
    /// Length of each fade stage in seconds
    pub stage_duration: f32,
}

impl Default for TransitionSettings {
    fn default() -> Self {
        Self {
            stage_duration: FADE_STAGE_DURATION,
        }
    }
}

/// Which half of the fade is running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStage {
    /// Front layer 1 → 0
    FadeOut,
    /// Back layer 0 → 1
    FadeIn,
}

/// Result of advancing the controller by one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionStatus {
    /// No fade in flight
    Idle,
    Running,
    /// The fade completed during this tick and the layers were swapped
    Finished,
}

/// In-flight fade. Dropped on completion or cancellation.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Fade {
    target: SpriteId,
    stage: FadeStage,
    elapsed: f32,
}

/// Drives timed fades on a [`ParallaxScroller`]
#[derive(Debug, Clone)]
pub struct BackgroundTransition {
    settings: TransitionSettings,
    visuals: PhaseVisuals,
    active: Option<Fade>,
}

impl BackgroundTransition {
    pub fn new(settings: TransitionSettings, visuals: PhaseVisuals) -> Self {
        Self {
            settings,
            visuals,
            active: None,
        }
    }

    /// Start fading to the background of `phase`, discarding any fade in flight
    pub fn transition_to(&mut self, phase: Phase, scroller: &mut ParallaxScroller) {
        if self.active.take().is_some() {
            log::debug!("Background fade interrupted by a new fade");
        }
        scroller.set_layer_alpha(LayerRole::Back, 0.0);
        self.active = Some(Fade {
            target: self.visuals.background(phase),
            stage: FadeStage::FadeOut,
            elapsed: 0.0,
        });
    }

    /// Show the background of `phase` on both layers immediately
    pub fn set_instant(&mut self, phase: Phase, scroller: &mut ParallaxScroller) {
        self.active = None;
        let sprite = self.visuals.background(phase);
        for role in [LayerRole::Front, LayerRole::Back] {
            scroller.set_layer_sprite(role, sprite);
            scroller.set_layer_alpha(role, 1.0);
        }
    }

    /// Drop the fade in flight, leaving layers as they are
    pub fn cancel(&mut self) {
        self.active = None;
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Current stage and its progress ratio, if a fade is running
    pub fn progress(&self) -> Option<(FadeStage, f32)> {
        self.active
            .map(|fade| (fade.stage, self.stage_ratio(fade.elapsed)))
    }

    fn stage_ratio(&self, elapsed: f32) -> f32 {
        if self.settings.stage_duration <= 0.0 {
            return 1.0;
        }
        crate::clamp01(elapsed / self.settings.stage_duration)
    }

    fn stage_done(&self, elapsed: f32) -> bool {
        elapsed + TIME_EPSILON >= self.settings.stage_duration
    }

    pub fn tick(&mut self, dt: f32, scroller: &mut ParallaxScroller) -> TransitionStatus {
        let Some(mut fade) = self.active else {
            return TransitionStatus::Idle;
        };

        fade.elapsed += dt.max(0.0);
        let ratio = self.stage_ratio(fade.elapsed);

        match fade.stage {
            FadeStage::FadeOut => {
                scroller.set_layer_alpha(LayerRole::Front, 1.0 - ratio);
                if self.stage_done(fade.elapsed) {
                    scroller.set_layer_sprite(LayerRole::Back, fade.target);
                    fade.stage = FadeStage::FadeIn;
                    fade.elapsed = 0.0;
                }
            }
            FadeStage::FadeIn => {
                scroller.set_layer_alpha(LayerRole::Back, ratio);
                if self.stage_done(fade.elapsed) {
                    scroller.set_layer_alpha(LayerRole::Front, 0.0);
                    scroller.set_layer_alpha(LayerRole::Back, 1.0);
                    scroller.swap_layers();
                    self.active = None;
                    return TransitionStatus::Finished;
                }
            }
        }

        self.active = Some(fade);
        TransitionStatus::Running
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::parallax::ParallaxSettings;
    use proptest::prelude::*;

    fn setup() -> (BackgroundTransition, ParallaxScroller) {
        let visuals = PhaseVisuals::default();
        let scroller =
            ParallaxScroller::new(ParallaxSettings::default(), visuals.background(Phase::Classic));
        (
            BackgroundTransition::new(TransitionSettings::default(), visuals),
            scroller,
        )
    }

    fn run_to_end(t: &mut BackgroundTransition, s: &mut ParallaxScroller, dt: f32) -> u32 {
        let mut ticks = 0;
        loop {
            ticks += 1;
            if t.tick(dt, s) == TransitionStatus::Finished {
                return ticks;
            }
            assert!(ticks < 10_000, "fade never finished");
        }
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let (mut t, mut s) = setup();
        let before = s.clone();
        assert_eq!(t.tick(0.1, &mut s), TransitionStatus::Idle);
        assert_eq!(s, before);
    }

    #[test]
    fn test_fade_takes_two_stages() {
        let (mut t, mut s) = setup();
        let ice = PhaseVisuals::default().background(Phase::Ice);
        let start_front = s.front_slot();

        t.transition_to(Phase::Ice, &mut s);
        assert_eq!(s.layer(LayerRole::Back).alpha, 0.0);

        // 0.125s ticks: 4 per stage, 8 total = 1s
        let ticks = run_to_end(&mut t, &mut s, 0.125);
        assert_eq!(ticks, 8);
        assert!(!t.is_running());

        assert_ne!(s.front_slot(), start_front);
        assert_eq!(s.layer(LayerRole::Front).sprite, ice);
        assert_eq!(s.layer(LayerRole::Front).alpha, 1.0);
        assert_eq!(s.layer(LayerRole::Back).alpha, 0.0);
    }

    #[test]
    fn test_back_sprite_assigned_at_stage_boundary() {
        let (mut t, mut s) = setup();
        let classic = s.layer(LayerRole::Back).sprite;
        let ice = PhaseVisuals::default().background(Phase::Ice);
        let start_front = s.front_slot();

        t.transition_to(Phase::Ice, &mut s);
        for _ in 0..3 {
            t.tick(0.125, &mut s);
            assert_eq!(s.layer(LayerRole::Back).sprite, classic);
            assert_eq!(s.layer(LayerRole::Back).alpha, 0.0);
        }
        t.tick(0.125, &mut s);
        assert_eq!(s.layer(LayerRole::Front).alpha, 0.0);
        assert_eq!(s.layer(LayerRole::Back).sprite, ice);
        // Roles only swap once the fade-in completes
        assert_eq!(s.front_slot(), start_front);
        assert_eq!(t.progress(), Some((FadeStage::FadeIn, 0.0)));
    }

    #[test]
    fn test_next_fade_starts_from_other_layer() {
        let (mut t, mut s) = setup();
        t.transition_to(Phase::Ice, &mut s);
        run_to_end(&mut t, &mut s, 0.1);
        let slot_after_first = s.front_slot();

        t.transition_to(Phase::Earthquake, &mut s);
        run_to_end(&mut t, &mut s, 0.1);
        assert_ne!(s.front_slot(), slot_after_first);
        assert_eq!(
            s.layer(LayerRole::Front).sprite,
            PhaseVisuals::default().background(Phase::Earthquake)
        );
        // The old front keeps the sprite it had
        assert_eq!(
            s.layer(LayerRole::Back).sprite,
            PhaseVisuals::default().background(Phase::Ice)
        );
    }

    #[test]
    fn test_restart_discards_previous_fade() {
        let (mut t, mut s) = setup();
        t.transition_to(Phase::Ice, &mut s);
        for _ in 0..6 {
            t.tick(0.125, &mut s);
        }
        assert_eq!(t.progress().map(|p| p.0), Some(FadeStage::FadeIn));

        t.transition_to(Phase::NarrowPassages, &mut s);
        assert_eq!(t.progress(), Some((FadeStage::FadeOut, 0.0)));
        assert_eq!(s.layer(LayerRole::Back).alpha, 0.0);

        run_to_end(&mut t, &mut s, 0.125);
        assert_eq!(
            s.layer(LayerRole::Front).sprite,
            PhaseVisuals::default().background(Phase::NarrowPassages)
        );
    }

    #[test]
    fn test_set_instant_cancels_and_is_idempotent() {
        let (mut t, mut s) = setup();
        t.transition_to(Phase::Ice, &mut s);
        t.tick(0.2, &mut s);

        t.set_instant(Phase::Classic, &mut s);
        assert!(!t.is_running());
        let once = s.clone();
        t.set_instant(Phase::Classic, &mut s);
        assert_eq!(s, once);

        let classic = PhaseVisuals::default().background(Phase::Classic);
        for role in [LayerRole::Front, LayerRole::Back] {
            assert_eq!(s.layer(role).sprite, classic);
            assert_eq!(s.layer(role).alpha, 1.0);
        }
        assert_eq!(t.tick(0.5, &mut s), TransitionStatus::Idle);
    }

    #[test]
    fn test_missing_visual_fades_to_classic() {
        let mut visuals = PhaseVisuals::default();
        visuals.remove(Phase::Ice);
        let classic = visuals.background(Phase::Classic);
        let mut s = ParallaxScroller::new(ParallaxSettings::default(), SpriteId(42));
        let mut t = BackgroundTransition::new(TransitionSettings::default(), visuals);
        t.transition_to(Phase::Ice, &mut s);
        run_to_end(&mut t, &mut s, 0.25);
        assert_eq!(s.layer(LayerRole::Front).sprite, classic);
    }

    proptest! {
        #[test]
        fn prop_fade_is_monotonic(dts in prop::collection::vec(0.001f32..0.2, 1..200)) {
            let (mut t, mut s) = setup();
            t.transition_to(Phase::Ice, &mut s);
            let mut last_front = s.layer(LayerRole::Front).alpha;
            let mut last_back = s.layer(LayerRole::Back).alpha;
            for dt in dts {
                let stage = t.progress().map(|p| p.0);
                let status = t.tick(dt, &mut s);
                if status != TransitionStatus::Running {
                    break;
                }
                match stage {
                    Some(FadeStage::FadeOut) => {
                        let front = s.layer(LayerRole::Front).alpha;
                        prop_assert!(front <= last_front);
                        last_front = front;
                    }
                    Some(FadeStage::FadeIn) => {
                        let back = s.layer(LayerRole::Back).alpha;
                        prop_assert!(back >= last_back);
                        last_back = back;
                    }
                    None => unreachable!(),
                }
            }
        }

        #[test]
        fn prop_interrupted_fades_end_swapped(
            interrupts in prop::collection::vec(0usize..12, 0..5),
            dt in 0.01f32..0.2,
        ) {
            let (mut t, mut s) = setup();
            let phases = [Phase::Ice, Phase::Earthquake, Phase::AngledPassages];
            let mut target = Phase::Ice;
            t.transition_to(target, &mut s);
            for (i, ticks) in interrupts.into_iter().enumerate() {
                for _ in 0..ticks {
                    if t.tick(dt, &mut s) == TransitionStatus::Finished {
                        break;
                    }
                }
                target = phases[i % phases.len()];
                t.transition_to(target, &mut s);
            }
            let slot_before = s.front_slot();
            let mut status = TransitionStatus::Running;
            while status != TransitionStatus::Finished {
                status = t.tick(dt, &mut s);
            }
            prop_assert_ne!(s.front_slot(), slot_before);
            prop_assert_eq!(s.layer(LayerRole::Back).alpha, 0.0);
            prop_assert_eq!(s.layer(LayerRole::Front).alpha, 1.0);
            prop_assert_eq!(
                s.layer(LayerRole::Front).sprite,
                PhaseVisuals::default().background(target)
            );
        }
    }
}
