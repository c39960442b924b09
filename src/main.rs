//! Phase Flap entry point
//!
//! Headless native driver: loads settings, runs a scripted session through the
//! simulation and logs every phase change. Rendering and input live elsewhere.

use std::path::PathBuf;

use clap::Parser;
use phase_flap::Settings;
use phase_flap::sim::{FlowEvent, GameEvent, RotationEvent, World};

/// Frame delta of the simulated display
const FRAME_DT: f32 = 1.0 / 60.0;

/// Scripted input at a point in real time
#[derive(Debug, Clone, Copy)]
enum Cue {
    StartGame,
    Publish(GameEvent),
}

const SCRIPT: &[(f32, Cue)] = &[
    (0.0, Cue::StartGame),
    (17.0, Cue::Publish(GameEvent::HazardZoneChanged(true))),
    (24.0, Cue::Publish(GameEvent::HazardZoneChanged(false))),
    (50.0, Cue::Publish(GameEvent::PlayerDied)),
    (52.0, Cue::StartGame),
];

/// Run a scripted headless Phase Flap session.
#[derive(Parser, Debug)]
#[command(name = "phase-flap", version, about)]
struct Cli {
    /// JSON settings file; defaults are used when omitted
    settings: Option<PathBuf>,

    /// Real seconds to simulate
    #[arg(default_value_t = 90.0, value_parser = parse_seconds)]
    seconds: f32,
}

fn parse_seconds(s: &str) -> Result<f32, String> {
    let seconds: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(format!("must be a positive number of seconds, got {seconds}"))
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    log::info!("Phase Flap (headless) starting...");

    let settings = match &cli.settings {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                std::process::exit(2);
            }
        },
        None => Settings::default(),
    };

    let mut world = World::new(&settings);
    let mut script = SCRIPT.iter().peekable();
    let mut elapsed = 0.0f32;
    let mut applied = 0u32;
    let mut spawned = 0usize;

    while elapsed < cli.seconds {
        while let Some((at, cue)) = script.next_if(|(at, _)| *at <= elapsed) {
            log::info!("[{at:>5.1}s] cue {cue:?}");
            match *cue {
                Cue::StartGame => world.start_game(),
                Cue::Publish(event) => world.signals().publish(event),
            }
        }

        world.update(FRAME_DT);
        elapsed += FRAME_DT;

        for event in world.take_flow_events() {
            match event {
                FlowEvent::CountdownTick(n) => log::info!("[{elapsed:>5.1}s] {n}..."),
                FlowEvent::CountdownFinished => log::info!("[{elapsed:>5.1}s] go!"),
                FlowEvent::StateChanged(state) => println!("[{elapsed:>5.1}s] == {state} =="),
            }
        }
        for event in world.take_events() {
            match event {
                RotationEvent::Announced(next) => {
                    log::info!("[{elapsed:>5.1}s] announcing {next}");
                }
                RotationEvent::Applied { from, to } => {
                    applied += 1;
                    println!("[{elapsed:>5.1}s] {from} -> {to}");
                }
            }
        }
        spawned += world.take_spawns().len();
    }

    println!(
        "\n{:.0}s simulated: {applied} phase changes, {spawned} obstacles, ending in {} ({})",
        cli.seconds,
        world.current_phase(),
        world.game_state()
    );
}
