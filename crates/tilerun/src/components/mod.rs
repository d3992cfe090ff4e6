pub mod behavior;
pub mod entity;
pub mod layer;
pub mod tilemap;
