pub mod bounds;
pub mod level;
pub mod matrix;
pub mod time;
