use bytemuck::{Pod, Zeroable};

/// Per-instance draw data handed to an external renderer.
/// 8 floats = 32 bytes stride, uploadable as-is.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Left edge in world space.
    pub x: f32,
    /// Top edge in world space (Y down).
    pub y: f32,
    /// Drawn width in world units.
    pub width: f32,
    /// Drawn height in world units.
    pub height: f32,
    /// Sprite sheet column.
    pub sheet_col: f32,
    /// Sprite sheet row.
    pub sheet_row: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Compositor layer index, filled in by the compositor.
    pub layer: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// Contiguous run of instances produced by one compositor layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerBatch {
    /// Layer index in draw order.
    pub layer: u32,
    /// Start index in the instance array.
    pub start: u32,
    /// End index (exclusive) in the instance array.
    pub end: u32,
}

/// Instances for one frame, back to front, with per-layer batches.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    pub batches: Vec<LayerBatch>,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(512)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            batches: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
        self.batches.clear();
    }

    pub fn push(&mut self, instance: RenderInstance) {
        self.instances.push(instance);
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Instance data as raw bytes, ready for a GPU upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
