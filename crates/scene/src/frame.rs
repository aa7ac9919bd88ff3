//! Sprite sheet frame addressing.

use common::geometry::{Rect, Size};
use tracing::warn;

/// A sprite sheet laid out as a grid of equally sized cells.
///
/// Frames are numbered left to right, then top to bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameGrid {
    columns: u32,
    rows: u32,
    cell: Size,
}

impl FrameGrid {
    /// Split a sheet of `sheet` size into `columns` x `rows` cells.
    ///
    /// A zero column or row count is treated as one.
    pub fn new(columns: u32, rows: u32, sheet: Size) -> Self {
        if columns == 0 || rows == 0 {
            warn!("[FrameGrid] invalid grid {}x{}, using at least one cell per axis", columns, rows);
        }
        let columns = columns.max(1);
        let rows = rows.max(1);

        Self {
            columns,
            rows,
            cell: Size::new(sheet.width / columns as f32, sheet.height / rows as f32),
        }
    }

    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Size of one frame in source pixels.
    #[inline]
    pub fn cell_size(&self) -> Size {
        self.cell
    }

    /// Number of frames the grid declares.
    #[inline]
    pub fn frame_count(&self) -> u32 {
        self.columns.saturating_mul(self.rows)
    }

    /// Column and row of `frame`.
    #[inline]
    pub fn cell_of(&self, frame: u32) -> (u32, u32) {
        (frame % self.columns, frame / self.columns)
    }

    /// Source rectangle of `frame`.
    ///
    /// Frames past `frame_count` are not rejected; they address cells below
    /// the sheet, which draw nothing.
    pub fn source_rect(&self, frame: u32) -> Rect {
        let (column, row) = self.cell_of(frame);
        Rect::new(
            column as f32 * self.cell.width,
            row as f32 * self.cell.height,
            self.cell.width,
            self.cell.height,
        )
    }
}
