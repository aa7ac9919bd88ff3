//! Cached color tinting of sprite sheets.
//!
//! A tint recolors the opaque pixels of a bitmap by filling it with a solid
//! color using the `SourceAtop` composite operation. Tints change far less
//! often than frames are drawn, so the tinted copy of the whole sheet is built
//! once and reused until the requested color changes.

use canvas::{Bitmap, CanvasContext2D, CompositeOperation, Surface};
use common::color::Color;
use common::geometry::Rect;
use tracing::debug;

/// What a draw with a given tint color will do with the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TintStatus {
    /// Transparent tint: draw from the original bitmap.
    NoTint,
    /// The cache holds a copy tinted with this color.
    Valid(Color),
    /// The cache is empty or was built for this other color.
    Stale(Option<Color>),
}

#[derive(Clone, Debug, Default)]
enum CacheState {
    #[default]
    Empty,
    Ready {
        color: Color,
        bitmap: Bitmap,
    },
}

/// Tinted copy of a bitmap and the color it was built for.
#[derive(Clone, Debug, Default)]
pub struct TintCache {
    state: CacheState,
    rebuilds: u64,
}

impl TintCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color the cached copy was built for.
    pub fn cached_color(&self) -> Option<Color> {
        match &self.state {
            CacheState::Empty => None,
            CacheState::Ready { color, .. } => Some(*color),
        }
    }

    /// Number of times a tinted copy has been built.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn status(&self, tint: Color) -> TintStatus {
        if tint.is_transparent() {
            return TintStatus::NoTint;
        }
        match self.cached_color() {
            Some(color) if color == tint => TintStatus::Valid(color),
            other => TintStatus::Stale(other),
        }
    }

    /// The bitmap to draw from for `tint`, rebuilding the tinted copy if the
    /// cache was built for another color.
    pub fn source_for<'a>(&'a mut self, source: &'a Bitmap, tint: Color) -> &'a Bitmap {
        match self.status(tint) {
            TintStatus::NoTint => return source,
            TintStatus::Valid(_) => {}
            TintStatus::Stale(_) => {
                debug!("rebuilding tint cache for {}", tint);
                self.state = CacheState::Ready {
                    color: tint,
                    bitmap: tint_bitmap(source, tint),
                };
                self.rebuilds += 1;
            }
        }

        match &self.state {
            CacheState::Ready { bitmap, .. } => bitmap,
            CacheState::Empty => source,
        }
    }
}

/// Recolor every opaque pixel of `source` with `tint`.
pub fn tint_bitmap(source: &Bitmap, tint: Color) -> Bitmap {
    let full = Rect::new(0.0, 0.0, source.width() as f32, source.height() as f32);

    let mut ctx = CanvasContext2D::new(source.width(), source.height());
    ctx.draw_image(source, full, full);
    ctx.set_composite_operation(CompositeOperation::SourceAtop);
    ctx.fill_rect(full, tint);
    ctx.into_bitmap()
}
