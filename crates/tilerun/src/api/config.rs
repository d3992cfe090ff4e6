use serde::{Deserialize, Serialize};

use crate::components::entity::Entity;

/// Configuration for a level, provided by the game or read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Downward acceleration in world units per second squared (default: 1500).
    /// Y grows downwards, so positive gravity pulls entities towards larger y.
    pub gravity: f32,
    /// Edge length of one tile in world units (default: 16).
    pub tile_size: f32,
    /// Collision types the tile collider treats as solid (default: `["ground"]`).
    pub solid_types: Vec<String>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            gravity: 1500.0,
            tile_size: 16.0,
            solid_types: vec!["ground".to_string()],
        }
    }
}

impl LevelConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Read-only level state handed to entities during the update and finalize passes.
///
/// Besides the level scalars it lends out every entity except the one being
/// run. Entities ahead of it in the level have already run the current pass.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub gravity: f32,
    /// Simulated time before the current frame, in seconds.
    pub total_time: f32,
    before: &'a [Entity],
    after: &'a [Entity],
}

impl<'a> FrameContext<'a> {
    /// A context with no other entities in view.
    pub fn new(gravity: f32, total_time: f32) -> Self {
        Self {
            gravity,
            total_time,
            before: &[],
            after: &[],
        }
    }

    /// Show the entities on either side of the one being run.
    pub fn with_others(mut self, before: &'a [Entity], after: &'a [Entity]) -> Self {
        self.before = before;
        self.after = after;
        self
    }

    /// Every other entity in the level, in level order.
    pub fn others(&self) -> impl Iterator<Item = &'a Entity> + 'a {
        let (before, after) = (self.before, self.after);
        before.iter().chain(after)
    }

    /// Find another entity by tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&'a Entity> {
        self.others().find(|e| e.tag == tag)
    }
}
