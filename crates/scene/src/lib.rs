//! Headless globe surface: camera, WGS84 globe, entities, imagery layers and
//! the per-frame signal that view code hooks into.

pub mod camera;
pub mod color;
pub mod entity;
pub mod error;
pub mod globe;
pub mod imagery;
pub mod input;
pub mod picking;
pub mod tiling;
pub mod viewer;

pub use camera::*;
pub use color::*;
pub use entity::*;
pub use error::*;
pub use globe::*;
pub use imagery::*;
pub use input::*;
pub use picking::*;
pub use tiling::*;
pub use viewer::*;
