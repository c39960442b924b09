//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only advances through explicit deltas
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod camera;
pub mod events;
pub mod flow;
pub mod indicator;
pub mod modifiers;
pub mod obstacles;
pub mod parallax;
pub mod phase;
pub mod player;
pub mod rotation;
pub mod timer;
pub mod trail;
pub mod transition;
pub mod world;

pub use events::{GameEvent, Signals, Subscription};
pub use flow::{FlowEvent, GameFlow, GameState};
pub use indicator::{IndicatorStatus, PhaseIndicator, Viewport};
pub use modifiers::{ActiveModifiers, PhaseHooks, RecordingHooks};
pub use parallax::{LayerRole, ParallaxScroller};
pub use phase::{Color, Phase, PhaseVisual, PhaseVisuals, SpriteId};
pub use rotation::{PhaseRotation, RotationEvent, RotationState, RotationStep};
pub use timer::{FrameTime, GameClock, Timer};
pub use trail::{TrailParticle, TrailParticles};
pub use transition::{BackgroundTransition, FadeStage, TransitionStatus};
pub use world::{Actors, World};
