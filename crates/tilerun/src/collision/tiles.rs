//! Entity-vs-tile collision.
//!
//! The default `TileResolver` looks up the collision cells under an entity's
//! bounding box and pushes the entity out of every solid one along the axis
//! of least penetration, using the box's edge setters. An exit through an
//! edge shared with another solid tile is never chosen, so entities slide
//! along floors and walls built from many tiles instead of snagging on the
//! seams.

use std::ops::Range;

use crate::api::config::LevelConfig;
use crate::api::types::Side;
use crate::components::entity::Entity;
use crate::components::tilemap::{tile_to_world, world_to_tile, CollisionMatrix, CollisionTile};

/// A collision cell together with its world-space rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMatch<'a> {
    pub tile: &'a CollisionTile,
    pub index_x: i32,
    pub index_y: i32,
    pub x1: f32,
    pub x2: f32,
    pub y1: f32,
    pub y2: f32,
}

/// Resolves one entity against the collision grid.
/// Called once per entity per frame during the collision pass.
pub trait TileCollider {
    fn check(&self, grid: &CollisionMatrix, entity: &mut Entity);
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileResolver {
    pub tile_size: f32,
    pub solid_types: Vec<String>,
}

impl TileResolver {
    pub fn new(tile_size: f32, solid_types: Vec<String>) -> Self {
        Self { tile_size, solid_types }
    }

    pub fn from_config(config: &LevelConfig) -> Self {
        Self::new(config.tile_size, config.solid_types.clone())
    }

    /// Tile indices covering `[p1, p2)` in world units.
    /// Never empty, except for positions clamped to the last `i32` index.
    pub fn index_range(&self, p1: f32, p2: f32) -> Range<i32> {
        let start = world_to_tile(p1, self.tile_size);
        let end = (p2 / self.tile_size).ceil() as i32;
        start..end.max(start.saturating_add(1))
    }

    fn to_match<'g>(&self, grid: &'g CollisionMatrix, index_x: i32, index_y: i32) -> Option<TileMatch<'g>> {
        let tile = grid.get(index_x, index_y)?;
        let x1 = tile_to_world(index_x, self.tile_size);
        let y1 = tile_to_world(index_y, self.tile_size);
        Some(TileMatch {
            tile,
            index_x,
            index_y,
            x1,
            x2: x1 + self.tile_size,
            y1,
            y2: y1 + self.tile_size,
        })
    }

    /// The cell containing a world position, if one is set.
    pub fn search_by_position<'g>(&self, grid: &'g CollisionMatrix, x: f32, y: f32) -> Option<TileMatch<'g>> {
        self.to_match(
            grid,
            world_to_tile(x, self.tile_size),
            world_to_tile(y, self.tile_size),
        )
    }

    /// Every set cell under a world-space rectangle.
    pub fn search_by_range<'g>(
        &self,
        grid: &'g CollisionMatrix,
        x1: f32,
        x2: f32,
        y1: f32,
        y2: f32,
    ) -> Vec<TileMatch<'g>> {
        let mut matches = Vec::new();
        for index_x in self.index_range(x1, x2) {
            for index_y in self.index_range(y1, y2) {
                if let Some(m) = self.to_match(grid, index_x, index_y) {
                    matches.push(m);
                }
            }
        }
        matches
    }

    fn is_solid(&self, tile: &CollisionTile) -> bool {
        tile.is_one_of(&self.solid_types)
    }

    fn is_solid_at(&self, grid: &CollisionMatrix, index_x: Option<i32>, index_y: Option<i32>) -> bool {
        let (Some(index_x), Some(index_y)) = (index_x, index_y) else {
            return false;
        };
        grid.get(index_x, index_y).is_some_and(|t| self.is_solid(t))
    }

    /// Pick the side of the entity that gets pushed out of `m`.
    fn exit_side(&self, grid: &CollisionMatrix, entity: &Entity, m: &TileMatch<'_>) -> Option<Side> {
        let b = entity.bounds();
        let overlap_x = b.right().min(m.x2) - b.left().max(m.x1);
        let overlap_y = b.bottom().min(m.y2) - b.top().max(m.y1);
        if overlap_x <= 0.0 || overlap_y <= 0.0 {
            return None;
        }

        let (vertical, vertical_blocked) = if b.center_y() < (m.y1 + m.y2) / 2.0 {
            (Side::Bottom, self.is_solid_at(grid, Some(m.index_x), m.index_y.checked_sub(1)))
        } else {
            (Side::Top, self.is_solid_at(grid, Some(m.index_x), m.index_y.checked_add(1)))
        };
        let (horizontal, horizontal_blocked) = if b.center_x() < (m.x1 + m.x2) / 2.0 {
            (Side::Right, self.is_solid_at(grid, m.index_x.checked_sub(1), Some(m.index_y)))
        } else {
            (Side::Left, self.is_solid_at(grid, m.index_x.checked_add(1), Some(m.index_y)))
        };

        let side = match (vertical_blocked, horizontal_blocked) {
            (false, true) => vertical,
            (true, false) => horizontal,
            _ if overlap_y <= overlap_x => vertical,
            _ => horizontal,
        };
        Some(side)
    }
}

impl TileCollider for TileResolver {
    fn check(&self, grid: &CollisionMatrix, entity: &mut Entity) {
        let (x1, x2, y1, y2) = {
            let b = entity.bounds();
            (b.left(), b.right(), b.top(), b.bottom())
        };

        for m in self.search_by_range(grid, x1, x2, y1, y2) {
            if !self.is_solid(m.tile) {
                continue;
            }
            // Earlier pushes this frame may already have cleared this tile.
            let Some(side) = self.exit_side(grid, entity, &m) else {
                continue;
            };

            match side {
                Side::Bottom => {
                    entity.bounds_mut().set_bottom(m.y1);
                    if entity.vel.y > 0.0 {
                        entity.vel.y = 0.0;
                    }
                }
                Side::Top => {
                    entity.bounds_mut().set_top(m.y2);
                    if entity.vel.y < 0.0 {
                        entity.vel.y = 0.0;
                    }
                }
                Side::Right => {
                    entity.bounds_mut().set_right(m.x1);
                    if entity.vel.x > 0.0 {
                        entity.vel.x = 0.0;
                    }
                }
                Side::Left => {
                    entity.bounds_mut().set_left(m.x2);
                    if entity.vel.x < 0.0 {
                        entity.vel.x = 0.0;
                    }
                }
            }
            entity.obstruct(side, &m);
        }
    }
}
