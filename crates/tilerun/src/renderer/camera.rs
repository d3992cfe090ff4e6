use std::ops::Range;

use glam::Vec2;

use crate::components::tilemap::world_to_tile;

/// Viewport into the level, in world units. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::new(width, height),
        }
    }

    pub fn with_pos(mut self, pos: Vec2) -> Self {
        self.pos = pos;
        self
    }

    /// Tile columns and rows touching the viewport, including partly visible ones.
    pub fn visible_tiles(&self, tile_size: f32) -> (Range<i32>, Range<i32>) {
        let max = self.pos + self.size;
        let cols = world_to_tile(self.pos.x, tile_size)..(max.x / tile_size).ceil() as i32;
        let rows = world_to_tile(self.pos.y, tile_size)..(max.y / tile_size).ceil() as i32;
        (cols, rows)
    }

    /// Whether a world-space rectangle touches the viewport.
    pub fn sees(&self, pos: Vec2, size: Vec2) -> bool {
        let max = self.pos + self.size;
        pos.x < max.x && pos.x + size.x > self.pos.x && pos.y < max.y && pos.y + size.y > self.pos.y
    }
}
