//! Scene graph of canvas shapes.
//!
//! The scene owns an ordered list of shapes and draws the dirty ones each tick.
//! The main shape kind is the animated sprite (`SpriteShape`), which draws one
//! frame of a sprite sheet with an optional cached color tint and can be
//! reconstructed from streamed `ShapeRecord`s.

pub mod codec;
pub mod frame;
pub mod id;
pub mod image_shape;
pub mod registry;
pub mod scene;
pub mod shape;
pub mod sprite;
pub mod tint;

pub use codec::{Extent, RecordStream, ShapeRecord};
pub use frame::FrameGrid;
pub use id::{ShapeId, ShapeIdAllocator};
pub use image_shape::ImageShape;
pub use registry::ImageRegistry;
pub use self::scene::{DrawStats, Scene};
pub use shape::{ImageSource, Shape, ShapeState};
pub use sprite::SpriteShape;
pub use tint::{TintCache, TintStatus};
