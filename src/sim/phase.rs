//! Gameplay phases and their per-phase visuals

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A gameplay phase. Exactly one is current at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum Phase {
    /// Baseline rules, no modifiers
    #[default]
    Classic,
    InvertedGravity,
    Ice,
    NarrowPassages,
    Earthquake,
    MovingObstacles,
    AngledPassages,
    PlayerSizeChange,
}

impl Phase {
    /// Every phase, in declaration order
    pub const ALL: [Phase; 8] = [
        Phase::Classic,
        Phase::InvertedGravity,
        Phase::Ice,
        Phase::NarrowPassages,
        Phase::Earthquake,
        Phase::MovingObstacles,
        Phase::AngledPassages,
        Phase::PlayerSizeChange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Classic => "Classic",
            Phase::InvertedGravity => "Inverted Gravity",
            Phase::Ice => "Ice",
            Phase::NarrowPassages => "Narrow Passages",
            Phase::Earthquake => "Earthquake",
            Phase::MovingObstacles => "Moving Obstacles",
            Phase::AngledPassages => "Angled Passages",
            Phase::PlayerSizeChange => "Player Size Change",
        }
    }

    /// Pick a phase uniformly at random, rejecting `current` until a different one comes up
    pub fn random_other<R: Rng + ?Sized>(current: Phase, rng: &mut R) -> Phase {
        loop {
            let candidate = Self::ALL[rng.random_range(0..Self::ALL.len())];
            if candidate != current {
                return candidate;
            }
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle to a background sprite owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SpriteId(pub u32);

/// Linear RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Same color with a different alpha
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Static per-phase presentation: background sprite and indicator trail color
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseVisual {
    pub background: SpriteId,
    pub trail_color: Color,
}

/// Read-only phase → visual table.
///
/// Lookups never fail: a phase with no entry resolves to the Classic entry,
/// and a table with no Classic entry resolves to [`PhaseVisual::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseVisuals {
    entries: BTreeMap<Phase, PhaseVisual>,
}

impl PhaseVisuals {
    /// Table with no entries (every lookup falls back)
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, phase: Phase, visual: PhaseVisual) {
        self.entries.insert(phase, visual);
    }

    pub fn remove(&mut self, phase: Phase) -> Option<PhaseVisual> {
        self.entries.remove(&phase)
    }

    /// Whether `phase` has its own entry (no fallback)
    pub fn contains(&self, phase: Phase) -> bool {
        self.entries.contains_key(&phase)
    }

    pub fn get(&self, phase: Phase) -> PhaseVisual {
        if let Some(visual) = self.entries.get(&phase) {
            return *visual;
        }
        if phase != Phase::Classic {
            log::warn!("No visual configured for phase {phase}, using Classic");
        }
        self.entries
            .get(&Phase::Classic)
            .copied()
            .unwrap_or_default()
    }

    pub fn background(&self, phase: Phase) -> SpriteId {
        self.get(phase).background
    }

    pub fn trail_color(&self, phase: Phase) -> Color {
        self.get(phase).trail_color
    }
}

impl Default for PhaseVisuals {
    fn default() -> Self {
        let colors = [
            Color::rgb(1.0, 1.0, 1.0),
            Color::rgb(0.62, 0.36, 0.95),
            Color::rgb(0.55, 0.88, 1.0),
            Color::rgb(0.95, 0.75, 0.2),
            Color::rgb(0.6, 0.4, 0.25),
            Color::rgb(0.3, 0.9, 0.45),
            Color::rgb(1.0, 0.45, 0.3),
            Color::rgb(1.0, 0.4, 0.75),
        ];
        let entries = Phase::ALL
            .iter()
            .zip(colors)
            .enumerate()
            .map(|(i, (&phase, trail_color))| {
                let visual = PhaseVisual {
                    background: SpriteId(i as u32),
                    trail_color,
                };
                (phase, visual)
            })
            .collect();
        Self { entries }
    }
}
