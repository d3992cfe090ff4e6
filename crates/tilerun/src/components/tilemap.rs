//! Cell types stored in the level's sparse tile grids.
//!
//! Each render layer keeps a `TileMatrix` of sprite names; the level keeps one
//! merged `CollisionMatrix` of collision types. Grid coordinates are tile
//! indices; multiply by the tile size for world units.

use crate::core::matrix::Matrix;

/// What a render layer draws at one cell.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileCell {
    /// Sprite name, looked up in the sprite sheet. `None` draws nothing.
    pub name: Option<String>,
}

/// How one cell of the collision grid behaves.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollisionTile {
    /// Collision classification, e.g. "ground". `None` is not solid.
    pub tile_type: Option<String>,
}

impl CollisionTile {
    pub fn new(tile_type: impl Into<String>) -> Self {
        Self {
            tile_type: Some(tile_type.into()),
        }
    }

    /// Whether this cell's type appears in `solid_types`.
    pub fn is_one_of(&self, solid_types: &[String]) -> bool {
        match &self.tile_type {
            Some(t) => solid_types.iter().any(|s| s == t),
            None => false,
        }
    }
}

pub type TileMatrix = Matrix<TileCell>;
pub type CollisionMatrix = Matrix<CollisionTile>;

/// Tile index containing a world coordinate.
pub fn world_to_tile(pos: f32, tile_size: f32) -> i32 {
    (pos / tile_size).floor() as i32
}

/// World coordinate of a tile's leading edge.
pub fn tile_to_world(index: i32, tile_size: f32) -> f32 {
    index as f32 * tile_size
}
