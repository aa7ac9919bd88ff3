//! The shape capability contract shared by every scene node.

use crate::id::ShapeId;
use crate::registry::ImageRegistry;
use crate::sprite::SpriteShape;
use canvas::{Bitmap, Surface};
use common::color::Color;
use common::error::SceneResult;
use common::geometry::Rect;
use std::fmt;
use std::sync::Arc;

/// A drawable node owned by a `Scene`.
pub trait Shape: fmt::Debug {
    /// Shape identity.
    fn id(&self) -> ShapeId;

    /// Placement origin and destination size.
    fn bounds(&self) -> Rect;

    /// Type tag, stable across processes.
    fn shape_type(&self) -> &'static str;

    /// Whether the shape can change after construction.
    fn is_mutable(&self) -> bool;

    /// Whether the shape draws from a bitmap.
    fn is_image(&self) -> bool;

    /// Whether the shape changed since it was last drawn.
    fn is_dirty(&self) -> bool;

    /// Set or clear the dirty flag. The scene clears it after a successful draw.
    fn set_dirty(&mut self, dirty: bool);

    /// Draw onto `surface`.
    ///
    /// `color` is the scene-wide color multiplier. Shapes that have no use
    /// for it ignore it.
    fn draw(&mut self, surface: &mut dyn Surface, color: Option<Color>) -> SceneResult<()>;

    /// Resolve any image identifiers against the scene's registry.
    fn resolve_images(&mut self, _registry: &ImageRegistry) {}

    /// Downcast to a sprite.
    fn as_sprite_mut(&mut self) -> Option<&mut SpriteShape> {
        None
    }
}

/// State every shape kind carries.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeState {
    pub id: ShapeId,
    pub bounds: Rect,
    pub dirty: bool,
}

impl ShapeState {
    /// New shapes start dirty so they are drawn at least once.
    pub fn new(id: ShapeId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            dirty: true,
        }
    }
}

/// Where a shape gets its pixels from.
#[derive(Clone, Debug)]
pub enum ImageSource {
    /// A decoded bitmap handed in by the caller.
    Live(Arc<Bitmap>),
    /// An identifier into an `ImageRegistry`, with the bitmap once resolved.
    Named {
        image_id: String,
        resolved: Option<Arc<Bitmap>>,
    },
    /// An identifier looked up once, when the shape was reconstructed.
    ///
    /// The lookup is never repeated: the shape's geometry was derived from
    /// that snapshot, so a bitmap registered later would not match it.
    Snapshot {
        image_id: String,
        bitmap: Option<Arc<Bitmap>>,
    },
}

impl ImageSource {
    /// An identifier that has not been looked up yet.
    pub fn named(image_id: impl Into<String>) -> Self {
        ImageSource::Named {
            image_id: image_id.into(),
            resolved: None,
        }
    }

    /// The bitmap to draw from, if one is available.
    pub fn bitmap(&self) -> Option<&Arc<Bitmap>> {
        match self {
            ImageSource::Live(bitmap) => Some(bitmap),
            ImageSource::Named { resolved, .. } => resolved.as_ref(),
            ImageSource::Snapshot { bitmap, .. } => bitmap.as_ref(),
        }
    }

    pub fn image_id(&self) -> Option<&str> {
        match self {
            ImageSource::Live(_) => None,
            ImageSource::Named { image_id, .. } | ImageSource::Snapshot { image_id, .. } => Some(image_id),
        }
    }

    /// Look the identifier up again if it has not resolved yet. Snapshots
    /// are left alone.
    pub fn resolve(&mut self, registry: &ImageRegistry) {
        if let ImageSource::Named { image_id, resolved } = self {
            if resolved.is_none() {
                *resolved = registry.lookup(image_id.as_str());
            }
        }
    }

    /// Name used when reporting draw failures.
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Live(bitmap) => format!("<bitmap {}x{}>", bitmap.width(), bitmap.height()),
            ImageSource::Named { image_id, .. } | ImageSource::Snapshot { image_id, .. } => image_id.clone(),
        }
    }
}
