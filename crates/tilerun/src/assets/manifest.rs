use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Authored level description, loaded from `levels/<name>.json`.
///
/// Geometry is stored compressed: each tile entry covers rectangular ranges
/// and may reference a reusable pattern instead of a literal tile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Sprite sheet used by the tile layers (default: "tiles").
    #[serde(rename = "spriteSheet", default, skip_serializing_if = "Option::is_none")]
    pub sprite_sheet: Option<String>,
    /// Tile layers, drawn back to front.
    #[serde(default)]
    pub layers: Vec<LayerSpec>,
    /// Named patterns shared by every layer.
    #[serde(default)]
    pub patterns: HashMap<String, PatternSpec>,
    /// Entities placed at load time.
    #[serde(default)]
    pub entities: Vec<EntitySpec>,
}

/// One visual layer; also contributes to the merged collision grid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerSpec {
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
}

/// A named, relatively positioned group of tile entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatternSpec {
    #[serde(default)]
    pub tiles: Vec<TileSpec>,
}

/// A tile entry: either a literal tile or a pattern reference, stamped at
/// every cell covered by `ranges`.
///
/// A range is `[x, y]`, `[x, width, y]` or `[x, width, y, height]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Sprite name for rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Collision classification (e.g. "ground").
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub tile_type: Option<String>,
    #[serde(default)]
    pub ranges: Vec<Vec<i32>>,
}

/// An entity to spawn: `name` selects the constructor, `position` is in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySpec {
    pub name: String,
    pub position: [f32; 2],
}

/// Sprite sheet description, loaded from `sprites/<name>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSheetSpec {
    /// Relative path or URL of the sheet image.
    #[serde(rename = "imageURL")]
    pub image_url: String,
    /// Tile width in pixels.
    #[serde(rename = "tileW")]
    pub tile_w: u32,
    /// Tile height in pixels.
    #[serde(rename = "tileH")]
    pub tile_h: u32,
    #[serde(default)]
    pub tiles: Vec<TileIndexSpec>,
}

/// Named tile and its cell in the sheet grid (column, row).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileIndexSpec {
    pub name: String,
    pub index: [u32; 2],
}

impl LevelSpec {
    /// Parse a level from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl SpriteSheetSpec {
    /// Parse a sprite sheet from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
