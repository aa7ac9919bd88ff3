//! Points, sizes and rectangles in canvas space.

use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A 2D point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// A 2D size.
///
/// A zero dimension is used by shape constructors to mean "not specified".
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// True when either dimension was given a non-zero value.
    #[inline]
    pub fn is_specified(&self) -> bool {
        self.width != 0.0 || self.height != 0.0
    }

    /// Replace each zero dimension with the matching dimension of `fallback`.
    #[inline]
    pub fn or(&self, fallback: Size) -> Size {
        Size::new(
            if self.width != 0.0 { self.width } else { fallback.width },
            if self.height != 0.0 { self.height } else { fallback.height },
        )
    }
}

/// A 2D rectangle.
///
/// Shapes use a `Rect` as their immutable bounds: placement origin plus
/// destination size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect { x: 0.0, y: 0.0, width: 0.0, height: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            width: size.width,
            height: size.height,
        }
    }

    #[inline]
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Snap outwards to whole pixels.
    pub fn to_pixel_rect(&self) -> PixelRect {
        PixelRect {
            x: self.x.floor() as i32,
            y: self.y.floor() as i32,
            width: self.width.ceil().max(0.0) as u32,
            height: self.height.ceil().max(0.0) as u32,
        }
    }
}

/// A rectangle in whole pixels, used for clipping blits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    /// Clip against a `width` x `height` target starting at the origin.
    pub fn clip_to(&self, width: u32, height: u32) -> Option<PixelRect> {
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = (self.x as i64 + self.width as i64).min(width as i64);
        let y1 = (self.y as i64 + self.height as i64).min(height as i64);

        if x1 > x0 as i64 && y1 > y0 as i64 {
            Some(PixelRect {
                x: x0,
                y: y0,
                width: (x1 - x0 as i64) as u32,
                height: (y1 - y0 as i64) as u32,
            })
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_fallback() {
        let dest = Size::new(50.0, 0.0);
        assert!(dest.is_specified());
        assert_eq!(dest.or(Size::new(10.0, 20.0)), Size::new(50.0, 20.0));
        assert!(!Size::ZERO.is_specified());
    }

    #[test]
    fn test_rect_parts() {
        let rect = Rect::from_origin_size(Point::new(1.0, 2.0) + Point::new(1.0, 1.0), Size::new(3.0, 0.0));
        assert_eq!(rect.origin(), Point::new(2.0, 3.0));
        assert_eq!(rect.size(), Size::new(3.0, 0.0));
        assert!(rect.is_empty());
    }

    #[test]
    fn test_pixel_rect_clip() {
        let rect = Rect::new(-2.5, 3.0, 10.0, 4.2).to_pixel_rect();
        assert_eq!(rect, PixelRect { x: -3, y: 3, width: 10, height: 5 });
        assert_eq!(
            rect.clip_to(4, 6),
            Some(PixelRect { x: 0, y: 3, width: 4, height: 3 })
        );
        assert_eq!(rect.clip_to(0, 0), None);
    }

    #[test]
    fn test_rect_serde_roundtrip_shape() {
        let json = serde_json::to_string(&Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json, r#"{"x":1.0,"y":2.0,"width":3.0,"height":4.0}"#);
    }
}
