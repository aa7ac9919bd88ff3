//! A surface that records draw calls instead of rasterizing them.

use crate::bitmap::Bitmap;
use crate::canvas::{CompositeOperation, Surface};
use common::color::Color;
use common::geometry::{Rect, Size};

/// A single recorded draw call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// An image blit.
    DrawImage {
        /// Size of the bitmap that was drawn from.
        image_size: Size,
        /// Color of the first pixel of the source region.
        sample: Color,
        src: Rect,
        dst: Rect,
        operation: CompositeOperation,
    },
    /// A solid fill.
    FillRect {
        rect: Rect,
        color: Color,
        operation: CompositeOperation,
    },
}

/// Surface that captures every draw call for later inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
    operation: CompositeOperation,
    save_stack: Vec<CompositeOperation>,
}

impl RecordingSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn draw_image(&mut self, image: &Bitmap, src: Rect, dst: Rect) {
        self.commands.push(DrawCommand::DrawImage {
            image_size: image.size(),
            sample: image.get_pixel(src.x.max(0.0) as u32, src.y.max(0.0) as u32),
            src,
            dst,
            operation: self.operation,
        });
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            rect,
            color,
            operation: self.operation,
        });
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) {
        self.operation = op;
    }

    fn composite_operation(&self) -> CompositeOperation {
        self.operation
    }

    fn save(&mut self) {
        self.save_stack.push(self.operation);
    }

    fn restore(&mut self) {
        if let Some(op) = self.save_stack.pop() {
            self.operation = op;
        }
    }
}
