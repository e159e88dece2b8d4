pub mod blocks;
pub mod models;

mod render;
pub use render::*;
