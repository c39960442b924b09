//! Composition root
//!
//! Builds every component from [`Settings`], wires the phase rotation to the
//! gameplay collaborators and runs the fixed-timestep loop. The world starts
//! in the menu; call [`World::start_game`] to reset and count down into play.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::camera::CameraShake;
use super::events::{GameEvent, Signals, Subscription};
use super::flow::{FlowEvent, GameFlow, GameState};
use super::indicator::PhaseIndicator;
use super::modifiers::PhaseHooks;
use super::obstacles::{ObstacleSpawn, ObstacleSpawner};
use super::parallax::ParallaxScroller;
use super::phase::Phase;
use super::player::Player;
use super::rotation::{PhaseRotation, RotationEvent};
use super::timer::GameClock;
use super::trail::TrailParticles;
use super::transition::BackgroundTransition;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;

/// Gameplay systems the phase modifiers act on
#[derive(Debug, Clone)]
pub struct Actors {
    pub player: Player,
    pub spawner: ObstacleSpawner,
    pub camera: CameraShake,
}

impl PhaseHooks for Actors {
    fn gravity_inverted(&self) -> bool {
        self.player.inverted_gravity()
    }

    fn set_inverted_gravity(&mut self, inverted: bool) {
        self.player.set_inverted_gravity(inverted);
    }

    fn set_ice_mode(&mut self, enabled: bool) {
        self.player.set_ice_mode(enabled);
    }

    fn randomize_player_size(&mut self) {
        self.player.randomize_size();
    }

    fn reset_player_size(&mut self) {
        self.player.reset_size();
    }

    fn set_narrow_passages(&mut self, enabled: bool) {
        self.spawner.set_narrow_passages(enabled);
    }

    fn set_moving_obstacles(&mut self, enabled: bool) {
        self.spawner.set_moving_obstacles(enabled);
    }

    fn set_angled_passages(&mut self, enabled: bool) {
        self.spawner.set_angled_passages(enabled);
    }

    fn start_camera_shake(&mut self) {
        self.camera.start();
    }

    fn stop_camera_shake(&mut self) {
        self.camera.stop();
    }
}

/// The whole simulation
pub struct World {
    clock: GameClock,
    flow: GameFlow,
    accumulator: f32,
    signals: Signals,
    inbox: Subscription,
    scroller: ParallaxScroller,
    particles: TrailParticles,
    rotation: PhaseRotation<Actors>,
    rng: Pcg32,
    spawns: Vec<ObstacleSpawn>,
    events: Vec<RotationEvent>,
    time_ticks: u64,
}

impl World {
    /// Build the world and start the phase cycle
    pub fn new(settings: &Settings) -> Self {
        let seed = settings.seed;
        let visuals = settings.visuals.clone();

        let scroller = ParallaxScroller::new(settings.parallax, visuals.background(Phase::Classic));
        let indicator = PhaseIndicator::new(settings.indicator, settings.viewport, visuals.clone());
        let transition = BackgroundTransition::new(settings.transition, visuals);
        let actors = Actors {
            player: Player::new(settings.player, seed.wrapping_add(1)),
            spawner: ObstacleSpawner::new(settings.obstacles),
            camera: CameraShake::new(settings.camera),
        };
        let mut rotation = PhaseRotation::new(
            settings.rotation,
            indicator,
            transition,
            actors,
            seed.wrapping_add(2),
        );
        rotation.start();

        let mut signals = Signals::new();
        let inbox = signals.subscribe();

        let mut clock = GameClock::new();
        let flow = GameFlow::new(settings.flow, &mut clock);

        log::info!("World created (seed {seed})");

        Self {
            clock,
            flow,
            accumulator: 0.0,
            signals,
            inbox,
            scroller,
            particles: TrailParticles::new(),
            rotation,
            rng: Pcg32::seed_from_u64(seed),
            spawns: Vec::new(),
            events: Vec::new(),
            time_ticks: 0,
        }
    }

    /// Run as many fixed steps as `frame_dt` covers. Returns the number of steps run.
    pub fn update(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.step(SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Advance the simulation by exactly one step of `dt` real seconds
    pub fn step(&mut self, dt: f32) {
        for event in self.inbox.drain() {
            self.handle(event);
        }

        self.flow.tick(dt, &mut self.clock);
        let time = self.clock.advance(dt);
        self.time_ticks += 1;

        self.scroller.tick(time.scaled);
        self.particles.tick(time.scaled);

        if let Some(event) = self
            .rotation
            .tick(time, &mut self.scroller, &mut self.particles)
        {
            self.events.push(event);
        }

        if self.flow.state() != GameState::Playing {
            return;
        }
        let actors = self.rotation.hooks_mut();
        actors.camera.tick(time.scaled, &mut self.rng);
        if let Some(spawn) = actors.spawner.tick(time.scaled, &mut self.rng) {
            self.spawns.push(spawn);
        }
    }

    fn handle(&mut self, event: GameEvent) {
        match event {
            GameEvent::GameReset => {
                self.rotation.reset_to_baseline(&mut self.scroller);
                let actors = self.rotation.hooks_mut();
                actors.player.reset();
                actors.spawner.reset();
                self.spawns.clear();
            }
            GameEvent::HazardZoneChanged(entered) => {
                log::debug!("Hazard zone {}", if entered { "entered" } else { "left" });
                self.rotation.on_hazard_zone_changed(entered);
            }
            GameEvent::PlayerDied => self.flow.end_game(&mut self.clock),
        }
    }

    /// Reset the run and start the countdown. Every subscriber, this world
    /// included, sees the reset on the next step.
    pub fn start_game(&mut self) {
        self.signals.publish(GameEvent::GameReset);
        self.flow.start_game(&mut self.clock);
    }

    /// Inbound event channel for collision and game-flow systems
    pub fn signals(&mut self) -> &mut Signals {
        &mut self.signals
    }

    pub fn pause(&mut self) {
        self.flow.pause(&mut self.clock);
    }

    pub fn resume(&mut self) {
        self.flow.resume(&mut self.clock);
    }

    pub fn back_to_menu(&mut self) {
        self.flow.back_to_menu(&mut self.clock);
    }

    pub fn game_state(&self) -> GameState {
        self.flow.state()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.is_paused()
    }

    pub fn rotation(&self) -> &PhaseRotation<Actors> {
        &self.rotation
    }

    pub fn actors(&self) -> &Actors {
        self.rotation.hooks()
    }

    pub fn current_phase(&self) -> Phase {
        self.rotation.current_phase()
    }

    pub fn scroller(&self) -> &ParallaxScroller {
        &self.scroller
    }

    pub fn particles(&self) -> &TrailParticles {
        &self.particles
    }

    pub fn clock(&self) -> &GameClock {
        &self.clock
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Obstacle spawns since the last call
    pub fn take_spawns(&mut self) -> Vec<ObstacleSpawn> {
        std::mem::take(&mut self.spawns)
    }

    /// Rotation events since the last call
    pub fn take_events(&mut self) -> Vec<RotationEvent> {
        std::mem::take(&mut self.events)
    }

    /// Game flow events since the last call
    pub fn take_flow_events(&mut self) -> Vec<FlowEvent> {
        self.flow.take_events()
    }
}
