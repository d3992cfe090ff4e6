use std::fmt;

use crate::components::entity::Entity;
use crate::renderer::camera::Camera;
use crate::renderer::instance::{LayerBatch, RenderBuffer};

/// What a layer may look at while drawing.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub camera: &'a Camera,
    pub entities: &'a [Entity],
}

/// One draw pass of the compositor.
pub trait Layer {
    /// Append this layer's instances to `out`.
    fn draw(&self, ctx: &DrawContext<'_>, out: &mut RenderBuffer);
}

/// Named render layers in registration order.
/// Layers are drawn back-to-front: first registered, first drawn.
#[derive(Default)]
pub struct Compositor {
    layers: Vec<(String, Box<dyn Layer>)>,
}

impl Compositor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a layer. Re-using a name replaces that layer in place.
    pub fn set(&mut self, name: impl Into<String>, layer: Box<dyn Layer>) {
        let name = name.into();
        match self.layers.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = layer,
            None => self.layers.push((name, layer)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Box<dyn Layer>> {
        let idx = self.layers.iter().position(|(n, _)| n == name)?;
        Some(self.layers.remove(idx).1)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Layer> {
        self.layers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, layer)| layer.as_ref())
    }

    /// Layer names in draw order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Draw every layer into `out`, recording one batch per layer.
    pub fn draw(&self, ctx: &DrawContext<'_>, out: &mut RenderBuffer) {
        for (index, (_, layer)) in self.layers.iter().enumerate() {
            let start = out.instances.len();
            layer.draw(ctx, out);
            for instance in &mut out.instances[start..] {
                instance.layer = index as f32;
            }
            out.batches.push(LayerBatch {
                layer: index as u32,
                start: start as u32,
                end: out.instances.len() as u32,
            });
        }
    }
}

impl fmt::Debug for Compositor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
