//! Common types shared by the canvas, scene and player crates.

pub mod color;
pub mod geometry;
pub mod error;

pub use color::Color;
pub use geometry::{Point, Size, Rect, PixelRect};
pub use error::{SceneError, SceneResult};
