pub mod entities;
pub mod tiles;
