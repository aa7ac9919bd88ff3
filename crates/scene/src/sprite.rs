//! Animated sprite shape.
//!
//! A sprite draws one frame of a sprite sheet. The sheet is split into a grid
//! of equally sized cells; `set_frame` picks the cell. The frame is drawn at
//! its native cell size, or scaled to the bounds when the shape was given an
//! explicit destination size ("fixed scale"). An optional tint recolors the
//! sheet's opaque pixels through a `TintCache`.

use crate::codec::{Extent, ShapeRecord};
use crate::frame::FrameGrid;
use crate::id::{ShapeId, ShapeIdAllocator};
use crate::registry::ImageRegistry;
use crate::shape::{ImageSource, Shape, ShapeState};
use crate::tint::TintCache;
use canvas::{Bitmap, Surface};
use common::color::Color;
use common::error::{SceneError, SceneResult};
use common::geometry::{Point, Rect, Size};
use std::sync::Arc;
use tracing::warn;

/// Type tag of sprite shapes.
pub const SPRITE_SHAPE_TYPE: &str = "AnimationImageShape";

/// One frame of a sprite sheet, optionally tinted.
#[derive(Debug)]
pub struct SpriteShape {
    state: ShapeState,
    source: ImageSource,
    fixed_scale: bool,
    grid: FrameGrid,
    frame: u32,
    color: Color,
    tint: TintCache,
}

impl SpriteShape {
    /// Create a sprite from a decoded bitmap.
    ///
    /// `dest` is the destination size; a zero dimension means "use the cell
    /// size". Giving either dimension switches the sprite to fixed scale.
    ///
    /// The bitmap must already be decoded. An empty bitmap is accepted with a
    /// warning but produces a zero-sized grid.
    pub fn from_bitmap(ids: &mut ShapeIdAllocator, bitmap: Arc<Bitmap>, columns: u32, rows: u32, dest: Size) -> Self {
        if bitmap.is_empty() {
            warn!("[SpriteShape] image is not initialized");
        }
        let sheet = bitmap.size();
        Self::local(ids.allocate(), ImageSource::Live(bitmap), columns, rows, sheet, dest)
    }

    /// Create a sprite from an image identifier.
    ///
    /// No bitmap is available yet, so the sheet size has to be passed in. The
    /// identifier is resolved against the scene's registry before each draw.
    pub fn from_image_id(
        ids: &mut ShapeIdAllocator,
        image_id: impl Into<String>,
        columns: u32,
        rows: u32,
        sheet: Size,
        dest: Size,
    ) -> Self {
        Self::local(ids.allocate(), ImageSource::named(image_id), columns, rows, sheet, dest)
    }

    fn local(id: ShapeId, source: ImageSource, columns: u32, rows: u32, sheet: Size, dest: Size) -> Self {
        let grid = FrameGrid::new(columns, rows, sheet);
        let bounds = Rect::from_origin_size(Point::ZERO, dest.or(grid.cell_size()));

        Self {
            state: ShapeState::new(id, bounds),
            source,
            fixed_scale: dest.is_specified(),
            grid,
            frame: 0,
            color: Color::TRANSPARENT,
            tint: TintCache::new(),
        }
    }

    /// Rebuild a sprite from a streamed record.
    ///
    /// The image is looked up in `registry` immediately and the grid is
    /// derived from its real size. The record's id is used as is. If the
    /// image is missing the sprite is still created, with zero-sized
    /// geometry, and every draw fails until it is replaced. The lookup is not
    /// repeated later.
    pub fn from_record(record: &ShapeRecord, registry: &ImageRegistry) -> Self {
        let resolved = registry.lookup(&record.image_id);
        if resolved.is_none() {
            warn!("[SpriteShape] image {} is not registered", record.image_id);
        }
        let sheet = resolved.as_ref().map(|b| b.size()).unwrap_or(Size::ZERO);

        Self {
            state: ShapeState::new(record.id, record.bounds(sheet)),
            source: ImageSource::Snapshot {
                image_id: record.image_id.clone(),
                bitmap: resolved,
            },
            fixed_scale: record.fixed_scale,
            grid: FrameGrid::new(record.columns, record.rows, sheet),
            frame: record.frame,
            color: record.color,
            tint: TintCache::new(),
        }
    }

    /// Move the sprite to `origin`, keeping its size.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.state.bounds = Rect::from_origin_size(origin, self.state.bounds.size());
        self
    }

    /// Current frame index.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Select a frame. Marks the sprite dirty only when the frame changes.
    ///
    /// Frames outside the grid are not rejected; they draw nothing.
    pub fn set_frame(&mut self, frame: u32) {
        if self.frame != frame {
            self.state.dirty = true;
        }
        self.frame = frame;
    }

    /// Current tint color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Set the tint color. A fully transparent color disables tinting.
    ///
    /// This does not mark the sprite dirty; whoever changes the tint is
    /// responsible for scheduling the redraw.
    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn is_fixed_scale(&self) -> bool {
        self.fixed_scale
    }

    pub fn grid(&self) -> &FrameGrid {
        &self.grid
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn image_id(&self) -> Option<&str> {
        self.source.image_id()
    }

    pub fn tint_cache(&self) -> &TintCache {
        &self.tint
    }

    /// Region of the sheet the current frame is drawn from.
    pub fn source_rect(&self) -> Rect {
        self.grid.source_rect(self.frame)
    }

    /// Where the current frame lands on the surface.
    pub fn destination_rect(&self) -> Rect {
        let bounds = self.state.bounds;
        if self.fixed_scale {
            bounds
        } else {
            Rect::from_origin_size(bounds.origin(), self.grid.cell_size())
        }
    }

    /// Encode the persistent fields for streaming.
    ///
    /// Only sprites that refer to their image by identifier can be streamed.
    pub fn to_record(&self) -> SceneResult<ShapeRecord> {
        let image_id = self
            .image_id()
            .ok_or_else(|| SceneError::codec(format!("shape {} has no image identifier", self.state.id)))?;
        let bounds = self.state.bounds;

        Ok(ShapeRecord {
            id: self.state.id,
            image_id: image_id.to_string(),
            origin: bounds.origin(),
            width: Extent::Fixed(bounds.width),
            height: Extent::Fixed(bounds.height),
            fixed_scale: self.fixed_scale,
            columns: self.grid.columns(),
            rows: self.grid.rows(),
            frame: self.frame,
            color: self.color,
        })
    }

    /// Whether `record` describes the same image, placement and grid as this
    /// sprite, so that applying it only needs to update frame and color.
    pub fn layout_matches(&self, record: &ShapeRecord) -> bool {
        let sheet = self.source.bitmap().map(|b| b.size()).unwrap_or(Size::ZERO);

        self.image_id() == Some(record.image_id.as_str())
            && self.fixed_scale == record.fixed_scale
            && self.grid.columns() == record.columns.max(1)
            && self.grid.rows() == record.rows.max(1)
            && self.state.bounds == record.bounds(sheet)
    }
}

impl Shape for SpriteShape {
    fn id(&self) -> ShapeId {
        self.state.id
    }

    fn bounds(&self) -> Rect {
        self.state.bounds
    }

    fn shape_type(&self) -> &'static str {
        SPRITE_SHAPE_TYPE
    }

    fn is_mutable(&self) -> bool {
        true
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
        let Some(bitmap) = self.source.bitmap().cloned() else {
            let image_id = self.source.describe();
            warn!("[SpriteShape#draw] Fail to draw: {}", image_id);
            return Err(SceneError::unresolved(image_id));
        };

        let src = self.source_rect();
        let dst = self.destination_rect();
        let image = self.tint.source_for(&bitmap, self.color);
        surface.draw_image(image, src, dst);
        Ok(())
    }

    fn resolve_images(&mut self, registry: &ImageRegistry) {
        self.source.resolve(registry);
    }

    fn as_sprite_mut(&mut self) -> Option<&mut SpriteShape> {
        Some(self)
    }
}
