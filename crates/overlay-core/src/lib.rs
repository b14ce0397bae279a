pub mod config;
pub mod constants;
pub mod ease;
pub mod engine;
pub mod geometry;
pub mod pool;
pub mod tween;

pub static PLANE_WGSL: &str = include_str!("../shaders/plane.wgsl");

pub use config::*;
pub use constants::*;
pub use ease::*;
pub use engine::*;
pub use geometry::*;
pub use pool::*;
pub use tween::*;
