//! Decoded RGBA bitmaps.

use common::color::Color;
use common::error::{SceneError, SceneResult};
use common::geometry::Size;
use image::{ImageFormat, Rgba, RgbaImage};
use std::path::Path;
use tracing::debug;

/// A decoded bitmap with straight (non-premultiplied) RGBA pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Bitmap {
    pixels: RgbaImage,
}

impl Bitmap {
    /// Create a fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    /// Create a bitmap filled with a single color.
    pub fn solid(width: u32, height: u32, color: Color) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba([color.r, color.g, color.b, color.a])),
        }
    }

    /// Create from raw RGBA data.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> SceneResult<Self> {
        let expected = width as usize * height as usize * 4;
        let actual = data.len();
        let pixels = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            SceneError::image(format!(
                "expected {} bytes for a {}x{} bitmap, got {}",
                expected, width, height, actual
            ))
        })?;

        Ok(Self { pixels })
    }

    /// Decode from encoded bytes (PNG, JPEG, GIF, ...).
    pub fn decode(bytes: &[u8]) -> SceneResult<Self> {
        let img = image::load_from_memory(bytes).map_err(|e| SceneError::image(e.to_string()))?;
        debug!("decoded {}x{} image ({:?})", img.width(), img.height(), img.color());

        Ok(Self {
            pixels: img.to_rgba8(),
        })
    }

    /// Decode an image file.
    pub fn open(path: impl AsRef<Path>) -> SceneResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::decode(&bytes)
    }

    /// Encode as PNG and write to `path`.
    pub fn save_png(&self, path: impl AsRef<Path>) -> SceneResult<()> {
        self.pixels
            .save_with_format(path, ImageFormat::Png)
            .map_err(|e| SceneError::image(e.to_string()))
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }

    /// A bitmap with no pixels has not finished decoding.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Get pixel at position. Out of range reads are transparent.
    pub fn get_pixel(&self, x: u32, y: u32) -> Color {
        match self.pixels.get_pixel_checked(x, y) {
            Some(Rgba([r, g, b, a])) => Color::rgba(*r, *g, *b, *a),
            None => Color::TRANSPARENT,
        }
    }

    /// Set pixel at position. Out of range writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width() || y >= self.height() {
            return;
        }
        self.pixels.put_pixel(x, y, Rgba([color.r, color.g, color.b, color.a]));
    }

    /// Fill every pixel with a color.
    pub fn fill(&mut self, color: Color) {
        for pixel in self.pixels.pixels_mut() {
            *pixel = Rgba([color.r, color.g, color.b, color.a]);
        }
    }

    /// Get memory size in bytes.
    pub fn memory_size(&self) -> usize {
        self.pixels.as_raw().len()
    }
}
