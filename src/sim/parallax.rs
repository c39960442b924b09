//! Two-layer looping parallax background
//!
//! Each layer is a row of identical tiles scrolling left. The front layer is
//! the visible gameplay background; the back layer is the fade target used by
//! [`super::transition::BackgroundTransition`]. Their roles swap after every
//! completed fade.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::phase::SpriteId;

/// Which layer an operation targets, resolved against the current front index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerRole {
    Front,
    Back,
}

/// Tuning for the scroller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallaxSettings {
    /// Scroll speed (world units per second)
    pub speed: f32,
    /// Width of one tile
    pub tile_width: f32,
    /// Tiles per layer (enough to cover the viewport plus one)
    pub tiles_per_layer: usize,
    /// Overlap applied when recycling to hide seams
    pub overlap: f32,
}

impl Default for ParallaxSettings {
    fn default() -> Self {
        Self {
            speed: 2.0,
            tile_width: 10.0,
            tiles_per_layer: 3,
            overlap: 0.01,
        }
    }
}

/// One background tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    pub pos: Vec2,
}

/// A row of tiles sharing one sprite and one opacity
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub tiles: Vec<Tile>,
    pub sprite: SpriteId,
    pub alpha: f32,
}

impl Layer {
    fn new(settings: &ParallaxSettings, sprite: SpriteId) -> Self {
        let tiles = (0..settings.tiles_per_layer.max(1))
            .map(|i| Tile {
                pos: Vec2::new(i as f32 * settings.tile_width, 0.0),
            })
            .collect();
        Self {
            tiles,
            sprite,
            alpha: 1.0,
        }
    }

    fn scroll(&mut self, settings: &ParallaxSettings, dt: f32) {
        let width = settings.tile_width;
        let wrap = width * self.tiles.len() as f32 - settings.overlap;
        for tile in &mut self.tiles {
            tile.pos.x -= settings.speed * dt;
            if tile.pos.x <= -width + settings.overlap {
                tile.pos.x += wrap;
            }
        }
    }
}

/// Owner of both background layers
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxScroller {
    settings: ParallaxSettings,
    layers: [Layer; 2],
    /// Physical index of the front layer
    front: usize,
}

impl ParallaxScroller {
    pub fn new(settings: ParallaxSettings, sprite: SpriteId) -> Self {
        Self {
            settings,
            layers: [Layer::new(&settings, sprite), Layer::new(&settings, sprite)],
            front: 0,
        }
    }

    /// Scroll both layers and recycle tiles that left the screen
    pub fn tick(&mut self, dt: f32) {
        for layer in &mut self.layers {
            layer.scroll(&self.settings, dt);
        }
    }

    fn index(&self, role: LayerRole) -> usize {
        match role {
            LayerRole::Front => self.front,
            LayerRole::Back => 1 - self.front,
        }
    }

    pub fn layer(&self, role: LayerRole) -> &Layer {
        &self.layers[self.index(role)]
    }

    /// Layer by physical slot (0 or 1), independent of role
    pub fn physical_layer(&self, slot: usize) -> Option<&Layer> {
        self.layers.get(slot)
    }

    /// Physical slot currently acting as the front layer
    pub fn front_slot(&self) -> usize {
        self.front
    }

    pub fn set_layer_sprite(&mut self, role: LayerRole, sprite: SpriteId) {
        let i = self.index(role);
        self.layers[i].sprite = sprite;
    }

    pub fn set_layer_alpha(&mut self, role: LayerRole, alpha: f32) {
        let i = self.index(role);
        self.layers[i].alpha = crate::clamp01(alpha);
    }

    /// Swap front and back roles. Physical layers keep their sprites.
    pub fn swap_layers(&mut self) {
        self.front = 1 - self.front;
    }

    pub fn settings(&self) -> &ParallaxSettings {
        &self.settings
    }
}
