use std::collections::HashMap;
use crate::assets::manifest::SpriteSheetSpec;

/// Cell of a named tile inside the sheet grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetCell {
    pub col: u32,
    pub row: u32,
}

/// Registry of named tiles, built from a `SpriteSheetSpec`.
/// Provides name-based lookup for the render layers.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    pub image_url: String,
    pub tile_w: u32,
    pub tile_h: u32,
    cells: HashMap<String, SheetCell>,
}

impl SpriteSheet {
    pub fn new(image_url: impl Into<String>, tile_w: u32, tile_h: u32) -> Self {
        Self {
            image_url: image_url.into(),
            tile_w,
            tile_h,
            cells: HashMap::new(),
        }
    }

    /// Build a registry from a parsed sheet. Later duplicates win.
    pub fn from_spec(spec: &SpriteSheetSpec) -> Self {
        let mut sheet = Self::new(spec.image_url.clone(), spec.tile_w, spec.tile_h);
        for tile in &spec.tiles {
            sheet.define(tile.name.clone(), tile.index[0], tile.index[1]);
        }
        sheet
    }

    pub fn define(&mut self, name: impl Into<String>, col: u32, row: u32) {
        self.cells.insert(name.into(), SheetCell { col, row });
    }

    /// Look up a tile by name. Returns None if not defined.
    pub fn get(&self, name: &str) -> Option<SheetCell> {
        self.cells.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
