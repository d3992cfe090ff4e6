pub mod api;
pub mod assets;
pub mod collision;
pub mod components;
pub mod core;
pub mod error;
pub mod renderer;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::config::{FrameContext, LevelConfig};
pub use api::types::{EntityId, Side};
pub use assets::loader::{AssetSource, DirSource, LevelLoader, MemorySource};
pub use assets::manifest::{EntitySpec, LayerSpec, LevelSpec, PatternSpec, SpriteSheetSpec, TileSpec};
pub use assets::registry::SpriteSheet;
pub use collision::entities::{EntityCollider, OverlapCollider};
pub use collision::tiles::{TileCollider, TileMatch, TileResolver};
pub use components::behavior::{Behavior, Footing, Gravity, Velocity, Walk};
pub use components::entity::Entity;
pub use components::layer::{Compositor, DrawContext, Layer};
pub use components::tilemap::{CollisionMatrix, CollisionTile, TileCell, TileMatrix};
pub use crate::core::bounds::BoundingBox;
pub use crate::core::level::Level;
pub use crate::core::matrix::Matrix;
pub use crate::core::time::Timer;
pub use error::LevelError;
pub use renderer::{Camera, LayerBatch, RenderBuffer, RenderInstance};
pub use systems::build::{EntityFactory, LevelBuilder};
pub use systems::expand::{expand_tiles, Placement};
pub use systems::render::{SpriteLayer, TileLayer};

pub use glam::Vec2;
