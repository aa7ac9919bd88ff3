//! Software 2D drawing surface.
//!
//! This crate provides the drawing primitives shapes are rendered with:
//! - decoded RGBA bitmaps
//! - the `Surface` trait (scaled image blits, rectangle fills, composite operations)
//! - a software `CanvasContext2D`
//! - a `RecordingSurface` that captures draw calls

pub mod bitmap;
pub mod canvas;
pub mod recording;

pub use bitmap::Bitmap;
pub use canvas::{CanvasContext2D, CompositeOperation, Surface};
pub use recording::{DrawCommand, RecordingSurface};
