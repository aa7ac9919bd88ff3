//! Canvas API implementation.

use crate::bitmap::Bitmap;
use common::color::Color;
use common::geometry::{PixelRect, Rect};
use tracing::debug;

/// Composite operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeOperation {
    /// Draw over existing pixels.
    #[default]
    SourceOver,
    /// Draw only where existing pixels are opaque, keeping their coverage.
    SourceAtop,
    /// Replace existing pixels inside the drawn area.
    Copy,
}

impl CompositeOperation {
    /// Combine a source pixel with the destination pixel it lands on.
    #[inline]
    pub fn composite(&self, source: Color, destination: Color) -> Color {
        match self {
            CompositeOperation::SourceOver => source.blend_over(destination),
            CompositeOperation::SourceAtop => source.blend_atop(destination),
            CompositeOperation::Copy => source,
        }
    }
}

/// A drawing surface shapes render onto.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> u32;

    /// Surface height in pixels.
    fn height(&self) -> u32;

    /// Draw the `src` region of `image` scaled into `dst`.
    fn draw_image(&mut self, image: &Bitmap, src: Rect, dst: Rect);

    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Set the composite operation used by subsequent draws.
    fn set_composite_operation(&mut self, op: CompositeOperation);

    /// Current composite operation.
    fn composite_operation(&self) -> CompositeOperation;

    /// Push the current drawing state.
    fn save(&mut self);

    /// Pop the most recently saved drawing state.
    fn restore(&mut self);
}

/// Saved context state.
#[derive(Clone, Copy, Debug)]
struct ContextState {
    composite_operation: CompositeOperation,
}

/// Software 2D rendering context backed by a bitmap.
#[derive(Clone, Debug)]
pub struct CanvasContext2D {
    /// Pixel data.
    pixels: Bitmap,
    /// Global composite operation.
    global_composite_operation: CompositeOperation,
    /// Save stack.
    save_stack: Vec<ContextState>,
}

impl CanvasContext2D {
    /// Create a new, fully transparent context.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: Bitmap::new(width, height),
            global_composite_operation: CompositeOperation::SourceOver,
            save_stack: Vec::new(),
        }
    }

    /// Fill the whole canvas, ignoring the composite operation.
    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    /// Get pixel at position.
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        self.pixels.get_pixel(x, y)
    }

    /// Borrow the rendered pixels.
    pub fn bitmap(&self) -> &Bitmap {
        &self.pixels
    }

    /// Consume the context, keeping the rendered pixels.
    pub fn into_bitmap(self) -> Bitmap {
        self.pixels
    }

    fn clip(&self, rect: &Rect) -> Option<PixelRect> {
        if rect.is_empty() {
            return None;
        }
        rect.to_pixel_rect().clip_to(self.pixels.width(), self.pixels.height())
    }
}

impl Surface for CanvasContext2D {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn draw_image(&mut self, image: &Bitmap, src: Rect, dst: Rect) {
        if src.is_empty() {
            return;
        }
        let Some(area) = self.clip(&dst) else {
            return;
        };

        let scale_x = src.width / dst.width;
        let scale_y = src.height / dst.height;
        let op = self.global_composite_operation;

        for y in area.y as u32..area.y as u32 + area.height {
            // Sample at pixel centres, nearest neighbour.
            let dy = y as f32 + 0.5 - dst.y;
            if dy < 0.0 || dy >= dst.height {
                continue;
            }
            let v = src.y + dy * scale_y;

            for x in area.x as u32..area.x as u32 + area.width {
                let dx = x as f32 + 0.5 - dst.x;
                if dx < 0.0 || dx >= dst.width {
                    continue;
                }
                let u = src.x + dx * scale_x;
                if u < 0.0 || v < 0.0 {
                    continue;
                }

                let (sx, sy) = (u.floor() as u32, v.floor() as u32);
                if sx >= image.width() || sy >= image.height() {
                    continue;
                }

                let existing = self.pixels.get_pixel(x, y);
                let color = op.composite(image.get_pixel(sx, sy), existing);
                self.pixels.set_pixel(x, y, color);
            }
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(area) = self.clip(&rect) else {
            return;
        };
        let op = self.global_composite_operation;

        for y in area.y as u32..area.y as u32 + area.height {
            for x in area.x as u32..area.x as u32 + area.width {
                let existing = self.pixels.get_pixel(x, y);
                self.pixels.set_pixel(x, y, op.composite(color, existing));
            }
        }
    }

    fn set_composite_operation(&mut self, op: CompositeOperation) {
        self.global_composite_operation = op;
    }

    fn composite_operation(&self) -> CompositeOperation {
        self.global_composite_operation
    }

    fn save(&mut self) {
        self.save_stack.push(ContextState {
            composite_operation: self.global_composite_operation,
        });
    }

    fn restore(&mut self) {
        match self.save_stack.pop() {
            Some(state) => self.global_composite_operation = state.composite_operation,
            None => debug!("restore() without matching save()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker() -> Bitmap {
        // 2x2: red, green / blue, transparent
        let mut bitmap = Bitmap::new(2, 2);
        bitmap.set_pixel(0, 0, Color::RED);
        bitmap.set_pixel(1, 0, Color::GREEN);
        bitmap.set_pixel(0, 1, Color::BLUE);
        bitmap
    }

    #[test]
    fn test_context_2d() {
        let mut ctx = CanvasContext2D::new(100, 100);
        ctx.fill_rect(Rect::new(10.0, 10.0, 20.0, 20.0), Color::RED);

        assert_eq!(ctx.get_pixel(10, 10), Color::RED);
        assert_eq!(ctx.get_pixel(29, 29), Color::RED);
        assert_eq!(ctx.get_pixel(30, 30), Color::TRANSPARENT);
    }

    #[test]
    fn test_save_restore() {
        let mut ctx = CanvasContext2D::new(4, 4);
        ctx.save();
        ctx.set_composite_operation(CompositeOperation::SourceAtop);
        assert_eq!(ctx.composite_operation(), CompositeOperation::SourceAtop);

        ctx.restore();
        assert_eq!(ctx.composite_operation(), CompositeOperation::SourceOver);

        // Unbalanced restore is ignored
        ctx.restore();
        assert_eq!(ctx.composite_operation(), CompositeOperation::SourceOver);
    }

    #[test]
    fn test_draw_image_unscaled() {
        let mut ctx = CanvasContext2D::new(4, 4);
        ctx.draw_image(&checker(), Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(1.0, 1.0, 2.0, 2.0));

        assert_eq!(ctx.get_pixel(1, 1), Color::RED);
        assert_eq!(ctx.get_pixel(2, 1), Color::GREEN);
        assert_eq!(ctx.get_pixel(1, 2), Color::BLUE);
        assert_eq!(ctx.get_pixel(2, 2), Color::TRANSPARENT);
        assert_eq!(ctx.get_pixel(0, 0), Color::TRANSPARENT);
    }

    #[test]
    fn test_draw_image_sub_rect_scaled() {
        let mut ctx = CanvasContext2D::new(4, 4);
        // Only the green source pixel, blown up to 4x4
        ctx.draw_image(&checker(), Rect::new(1.0, 0.0, 1.0, 1.0), Rect::new(0.0, 0.0, 4.0, 4.0));

        for y in 0..4 {
            for x in 0..4 {
                assert_eq!(ctx.get_pixel(x, y), Color::GREEN);
            }
        }
    }

    #[test]
    fn test_draw_image_outside_source_is_skipped() {
        let mut ctx = CanvasContext2D::new(2, 2);
        ctx.clear(Color::WHITE);
        ctx.draw_image(&checker(), Rect::new(4.0, 4.0, 2.0, 2.0), Rect::new(0.0, 0.0, 2.0, 2.0));
        assert_eq!(ctx.get_pixel(0, 0), Color::WHITE);
    }

    #[test]
    fn test_source_atop_fill() {
        let mut ctx = CanvasContext2D::new(2, 2);
        ctx.draw_image(&checker(), Rect::new(0.0, 0.0, 2.0, 2.0), Rect::new(0.0, 0.0, 2.0, 2.0));

        ctx.set_composite_operation(CompositeOperation::SourceAtop);
        ctx.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), Color::WHITE);

        assert_eq!(ctx.get_pixel(0, 0), Color::WHITE);
        assert_eq!(ctx.get_pixel(1, 0), Color::WHITE);
        assert_eq!(ctx.get_pixel(0, 1), Color::WHITE);
        assert_eq!(ctx.get_pixel(1, 1), Color::TRANSPARENT);
    }

    #[test]
    fn test_copy_replaces() {
        let mut ctx = CanvasContext2D::new(1, 1);
        ctx.clear(Color::WHITE);
        ctx.set_composite_operation(CompositeOperation::Copy);
        ctx.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Color::rgba(1, 2, 3, 4));
        assert_eq!(ctx.get_pixel(0, 0), Color::rgba(1, 2, 3, 4));
    }
}
