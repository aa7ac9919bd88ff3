//! Static image shape.

use crate::id::{ShapeId, ShapeIdAllocator};
use crate::registry::ImageRegistry;
use crate::shape::{ImageSource, Shape, ShapeState};
use canvas::{Bitmap, Surface};
use common::color::Color;
use common::error::{SceneError, SceneResult};
use common::geometry::{Point, Rect, Size};
use std::sync::Arc;
use tracing::warn;

/// Type tag of static image shapes.
pub const IMAGE_SHAPE_TYPE: &str = "ImageShape";

/// A whole bitmap drawn at its natural size or scaled to fixed bounds.
#[derive(Debug)]
pub struct ImageShape {
    state: ShapeState,
    source: ImageSource,
    fixed_scale: bool,
}

impl ImageShape {
    /// Create from a decoded bitmap. A zero `dest` dimension falls back to
    /// the bitmap's own size.
    pub fn from_bitmap(ids: &mut ShapeIdAllocator, bitmap: Arc<Bitmap>, dest: Size) -> Self {
        if bitmap.is_empty() {
            warn!("[ImageShape] image is not initialized");
        }
        let natural = bitmap.size();
        Self::build(ids.allocate(), ImageSource::Live(bitmap), natural, dest)
    }

    /// Create from an image identifier with its known size.
    pub fn from_image_id(ids: &mut ShapeIdAllocator, image_id: impl Into<String>, natural: Size, dest: Size) -> Self {
        Self::build(ids.allocate(), ImageSource::named(image_id), natural, dest)
    }

    fn build(id: ShapeId, source: ImageSource, natural: Size, dest: Size) -> Self {
        Self {
            state: ShapeState::new(id, Rect::from_origin_size(Point::ZERO, dest.or(natural))),
            source,
            fixed_scale: dest.is_specified(),
        }
    }

    /// Move the image to `origin`, keeping its size.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.state.bounds = Rect::from_origin_size(origin, self.state.bounds.size());
        self
    }

    pub fn is_fixed_scale(&self) -> bool {
        self.fixed_scale
    }
}

impl Shape for ImageShape {
    fn id(&self) -> ShapeId {
        self.state.id
    }

    fn bounds(&self) -> Rect {
        self.state.bounds
    }

    fn shape_type(&self) -> &'static str {
        IMAGE_SHAPE_TYPE
    }

    fn is_mutable(&self) -> bool {
        false
    }

    fn is_image(&self) -> bool {
        true
    }

    fn is_dirty(&self) -> bool {
        self.state.dirty
    }

    fn set_dirty(&mut self, dirty: bool) {
        self.state.dirty = dirty;
    }

    fn draw(&mut self, surface: &mut dyn Surface, _color: Option<Color>) -> SceneResult<()> {
        let Some(bitmap) = self.source.bitmap() else {
            let image_id = self.source.describe();
            warn!("[ImageShape#draw] Fail to draw: {}", image_id);
            return Err(SceneError::unresolved(image_id));
        };

        let src = Rect::from_origin_size(Point::ZERO, bitmap.size());
        let dst = if self.fixed_scale {
            self.state.bounds
        } else {
            Rect::from_origin_size(self.state.bounds.origin(), bitmap.size())
        };
        surface.draw_image(bitmap, src, dst);
        Ok(())
    }

    fn resolve_images(&mut self, registry: &ImageRegistry) {
        self.source.resolve(registry);
    }
}
