//! Scene graph: the ordered shape list and its draw loop.

use crate::codec::ShapeRecord;
use crate::id::{ShapeId, ShapeIdAllocator};
use crate::registry::ImageRegistry;
use crate::shape::Shape;
use crate::sprite::SpriteShape;
use canvas::Surface;
use common::color::Color;
use common::error::{SceneError, SceneResult};
use indexmap::IndexMap;
use tracing::{debug, warn};

/// Outcome of one draw pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DrawStats {
    /// Shapes drawn successfully.
    pub shapes_drawn: u32,
    /// Dirty shapes that could not be drawn and stay dirty.
    pub shapes_failed: u32,
    /// Clean shapes that were skipped.
    pub shapes_skipped: u32,
}

/// A list of shapes drawn back to front in insertion order.
#[derive(Debug, Default)]
pub struct Scene {
    /// Shapes in paint order.
    shapes: IndexMap<ShapeId, Box<dyn Shape>>,
    /// Id source for locally constructed shapes.
    ids: ShapeIdAllocator,
    /// Images shapes resolve against.
    registry: ImageRegistry,
    /// Statistics of the last draw pass.
    stats: DrawStats,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scene around an already populated registry.
    pub fn with_registry(registry: ImageRegistry) -> Self {
        Self {
            registry,
            ..Self::default()
        }
    }

    /// Id allocator for shapes built locally.
    pub fn ids_mut(&mut self) -> &mut ShapeIdAllocator {
        &mut self.ids
    }

    pub fn registry(&self) -> &ImageRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ImageRegistry {
        &mut self.registry
    }

    /// Append a shape on top of the others.
    pub fn add_shape<S: Shape + 'static>(&mut self, shape: S) -> SceneResult<ShapeId> {
        let id = shape.id();
        if self.shapes.contains_key(&id) {
            return Err(SceneError::invalid(format!("shape {} already exists", id)));
        }
        self.shapes.insert(id, Box::new(shape));
        Ok(id)
    }

    /// Remove a shape, keeping the paint order of the rest.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Box<dyn Shape>> {
        self.shapes.shift_remove(&id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&dyn Shape> {
        self.shapes.get(&id).map(|shape| &**shape)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut (dyn Shape + 'static)> {
        self.shapes.get_mut(&id).map(|shape| &mut **shape)
    }

    pub fn sprite_mut(&mut self, id: ShapeId) -> Option<&mut SpriteShape> {
        self.shapes.get_mut(&id).and_then(|shape| shape.as_sprite_mut())
    }

    /// Advance a sprite to `frame`.
    pub fn set_frame(&mut self, id: ShapeId, frame: u32) -> SceneResult<()> {
        let sprite = self.sprite_mut(id).ok_or(SceneError::ShapeNotFound(id.0))?;
        sprite.set_frame(frame);
        Ok(())
    }

    /// Retint a sprite and schedule its redraw if the tint changed.
    pub fn set_color(&mut self, id: ShapeId, color: Color) -> SceneResult<()> {
        let sprite = self.sprite_mut(id).ok_or(SceneError::ShapeNotFound(id.0))?;
        if sprite.color() != color {
            sprite.set_color(color);
            sprite.set_dirty(true);
        }
        Ok(())
    }

    /// Shape ids in paint order.
    pub fn ids(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.shapes.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Whether any shape changed since it was last drawn.
    pub fn needs_redraw(&self) -> bool {
        self.shapes.values().any(|shape| shape.is_dirty())
    }

    /// Force every shape to be drawn on the next pass.
    pub fn mark_all_dirty(&mut self) {
        for shape in self.shapes.values_mut() {
            shape.set_dirty(true);
        }
    }

    /// Draw every dirty shape in paint order.
    ///
    /// Shapes that fail to draw are logged and left dirty so the next pass
    /// tries them again. `color` is passed through to every shape.
    pub fn draw(&mut self, surface: &mut dyn Surface, color: Option<Color>) -> DrawStats {
        let mut stats = DrawStats::default();

        for shape in self.shapes.values_mut() {
            if !shape.is_dirty() {
                stats.shapes_skipped += 1;
                continue;
            }

            shape.resolve_images(&self.registry);
            match shape.draw(surface, color) {
                Ok(()) => {
                    shape.set_dirty(false);
                    stats.shapes_drawn += 1;
                }
                Err(err) if err.is_recoverable() => {
                    debug!("shape {} stays dirty: {}", shape.id(), err);
                    stats.shapes_failed += 1;
                }
                Err(err) => {
                    warn!("[{}#draw] shape {}: {}", shape.shape_type(), shape.id(), err);
                    stats.shapes_failed += 1;
                }
            }
        }

        self.stats = stats.clone();
        stats
    }

    /// Statistics of the last draw pass.
    pub fn stats(&self) -> &DrawStats {
        &self.stats
    }

    /// Apply an authoritative record.
    ///
    /// A record for an unknown id reconstructs a sprite on top of the scene.
    /// A record for an existing sprite with the same image, placement and grid
    /// only updates frame and tint; a tint change marks the sprite dirty. Any
    /// other record replaces the shape in place, as does any record for a
    /// sprite whose image was missing at reconstruction but is registered now.
    pub fn apply_record(&mut self, record: &ShapeRecord) -> ShapeId {
        let registered = self.registry.contains(&record.image_id);
        if let Some(sprite) = self.sprite_mut(record.id) {
            let stale = registered && sprite.source().bitmap().is_none();
            if !stale && sprite.layout_matches(record) {
                sprite.set_frame(record.frame);
                if sprite.color() != record.color {
                    sprite.set_color(record.color);
                    sprite.set_dirty(true);
                }
                return record.id;
            }
        }

        debug!("reconstructing shape {} from {}", record.id, record.image_id);
        let sprite = SpriteShape::from_record(record, &self.registry);
        self.shapes.insert(record.id, Box::new(sprite));
        record.id
    }

    /// Apply a batch of records in order.
    pub fn apply_batch(&mut self, records: &[ShapeRecord]) {
        for record in records {
            self.apply_record(record);
        }
    }
}
