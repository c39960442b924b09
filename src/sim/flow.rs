//! Game flow: menu, countdown, play, pause and game over
//!
//! The flow owns the pause switch of the [`GameClock`]. Scaled time only runs
//! while `Playing`; the countdown itself always runs on real time.

use serde::{Deserialize, Serialize};

use super::timer::{GameClock, Timer};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSettings {
    /// Countdown steps shown before play begins
    pub countdown_steps: u32,
    /// Real seconds per countdown step
    pub countdown_step_duration: f32,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            countdown_steps: 3,
            countdown_step_duration: 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameState {
    #[default]
    Menu,
    Countdown,
    Playing,
    Paused,
    GameOver,
}

impl GameState {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameState::Menu => "Menu",
            GameState::Countdown => "Countdown",
            GameState::Playing => "Playing",
            GameState::Paused => "Paused",
            GameState::GameOver => "Game Over",
        }
    }

    /// Scaled time runs only while playing
    pub fn runs_scaled_time(&self) -> bool {
        *self == GameState::Playing
    }
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Things the UI layer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowEvent {
    StateChanged(GameState),
    /// Countdown number to show (3, 2, 1)
    CountdownTick(u32),
    CountdownFinished,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Countdown {
    remaining: u32,
    timer: Timer,
}

#[derive(Debug, Clone)]
pub struct GameFlow {
    settings: FlowSettings,
    state: GameState,
    countdown: Option<Countdown>,
    events: Vec<FlowEvent>,
}

impl GameFlow {
    /// Start in the menu with scaled time frozen
    pub fn new(settings: FlowSettings, clock: &mut GameClock) -> Self {
        clock.set_paused(true);
        Self {
            settings,
            state: GameState::Menu,
            countdown: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    /// Countdown number currently shown, if counting down
    pub fn countdown_remaining(&self) -> Option<u32> {
        self.countdown.map(|c| c.remaining)
    }

    fn change_state(&mut self, state: GameState, clock: &mut GameClock) {
        self.state = state;
        clock.set_paused(!state.runs_scaled_time());
        self.events.push(FlowEvent::StateChanged(state));
        log::info!("Game state: {state}");
    }

    /// Begin a new run. The caller resets gameplay first; play starts once the
    /// countdown runs out.
    pub fn start_game(&mut self, clock: &mut GameClock) {
        self.change_state(GameState::Countdown, clock);
        if self.settings.countdown_steps == 0 {
            self.finish_countdown(clock);
            return;
        }
        self.countdown = Some(Countdown {
            remaining: self.settings.countdown_steps,
            timer: Timer::new(self.settings.countdown_step_duration),
        });
        self.events
            .push(FlowEvent::CountdownTick(self.settings.countdown_steps));
    }

    fn finish_countdown(&mut self, clock: &mut GameClock) {
        self.countdown = None;
        self.events.push(FlowEvent::CountdownFinished);
        self.change_state(GameState::Playing, clock);
    }

    /// Advance the countdown by `real_dt` seconds of real time
    pub fn tick(&mut self, real_dt: f32, clock: &mut GameClock) {
        let Some(mut countdown) = self.countdown else {
            return;
        };
        if !countdown.timer.tick(real_dt) {
            self.countdown = Some(countdown);
            return;
        }

        countdown.remaining -= 1;
        if countdown.remaining == 0 {
            self.finish_countdown(clock);
            return;
        }
        countdown.timer.reset();
        self.countdown = Some(countdown);
        self.events.push(FlowEvent::CountdownTick(countdown.remaining));
    }

    pub fn pause(&mut self, clock: &mut GameClock) {
        if self.state == GameState::Playing {
            self.change_state(GameState::Paused, clock);
        } else {
            log::debug!("Pause ignored in {}", self.state);
        }
    }

    pub fn resume(&mut self, clock: &mut GameClock) {
        if self.state == GameState::Paused {
            self.change_state(GameState::Playing, clock);
        } else {
            log::debug!("Resume ignored in {}", self.state);
        }
    }

    /// Player died
    pub fn end_game(&mut self, clock: &mut GameClock) {
        match self.state {
            GameState::Playing | GameState::Paused => {
                self.change_state(GameState::GameOver, clock)
            }
            _ => log::debug!("End of game ignored in {}", self.state),
        }
    }

    pub fn back_to_menu(&mut self, clock: &mut GameClock) {
        self.countdown = None;
        self.change_state(GameState::Menu, clock);
    }

    /// Flow events since the last call
    pub fn take_events(&mut self) -> Vec<FlowEvent> {
        std::mem::take(&mut self.events)
    }
}
