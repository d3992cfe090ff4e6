use std::rc::Rc;

use crate::assets::registry::SpriteSheet;
use crate::components::layer::{DrawContext, Layer};
use crate::components::tilemap::{tile_to_world, TileMatrix};
use crate::renderer::instance::{RenderBuffer, RenderInstance};

/// Draws one tile map, culled to the camera viewport.
#[derive(Debug, Clone)]
pub struct TileLayer {
    tiles: TileMatrix,
    sheet: Rc<SpriteSheet>,
    tile_size: f32,
}

impl TileLayer {
    pub fn new(tiles: TileMatrix, sheet: Rc<SpriteSheet>, tile_size: f32) -> Self {
        Self { tiles, sheet, tile_size }
    }

    pub fn tiles(&self) -> &TileMatrix {
        &self.tiles
    }
}

impl Layer for TileLayer {
    fn draw(&self, ctx: &DrawContext<'_>, out: &mut RenderBuffer) {
        let (cols, rows) = ctx.camera.visible_tiles(self.tile_size);

        // Only iterate visible tiles
        for x in cols {
            for y in rows.clone() {
                let Some(name) = self.tiles.get(x, y).and_then(|cell| cell.name.as_deref()) else {
                    continue;
                };
                let Some(cell) = self.sheet.get(name) else {
                    continue;
                };
                out.push(RenderInstance {
                    x: tile_to_world(x, self.tile_size),
                    y: tile_to_world(y, self.tile_size),
                    width: self.tile_size,
                    height: self.tile_size,
                    sheet_col: cell.col as f32,
                    sheet_row: cell.row as f32,
                    alpha: 1.0,
                    layer: 0.0,
                });
            }
        }
    }
}

/// Draws every visible entity that has a sprite known to the sheet.
#[derive(Debug, Clone)]
pub struct SpriteLayer {
    sheet: Rc<SpriteSheet>,
}

impl SpriteLayer {
    pub fn new(sheet: Rc<SpriteSheet>) -> Self {
        Self { sheet }
    }
}

impl Layer for SpriteLayer {
    fn draw(&self, ctx: &DrawContext<'_>, out: &mut RenderBuffer) {
        let size = glam::Vec2::new(self.sheet.tile_w as f32, self.sheet.tile_h as f32);
        for entity in ctx.entities {
            let Some(name) = entity.sprite.as_deref() else {
                continue;
            };
            let Some(cell) = self.sheet.get(name) else {
                log::trace!("entity {:?} uses unknown sprite `{}`", entity.id, name);
                continue;
            };
            if !ctx.camera.sees(entity.pos, size) {
                continue;
            }
            out.push(RenderInstance {
                x: entity.pos.x,
                y: entity.pos.y,
                width: size.x,
                height: size.y,
                sheet_col: cell.col as f32,
                sheet_row: cell.row as f32,
                alpha: 1.0,
                layer: 0.0,
            });
        }
    }
}
