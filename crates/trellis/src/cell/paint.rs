//! Paint-time arguments for the non-materialized rendering path.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use super::context::CellContext;
use crate::drawing::{Graphics, Rect};

/// Everything a paint observer needs to draw one cell: the surface, the
/// bounds to draw within, and the cell's context.
///
/// Derefs to [`CellContext`], so `args.row()` and `args.text_color()` work
/// directly.
#[derive(Clone)]
pub struct CellPaintArgs {
    graphics: Arc<dyn Graphics>,
    clip_rect: Rect,
    cell: Arc<CellContext>,
}

impl CellPaintArgs {
    pub fn new(graphics: Arc<dyn Graphics>, clip_rect: Rect, cell: Arc<CellContext>) -> Self {
        Self {
            graphics,
            clip_rect,
            cell,
        }
    }

    /// The surface to paint on.
    pub fn graphics(&self) -> &dyn Graphics {
        self.graphics.as_ref()
    }

    /// The cell's bounds on the surface.
    pub fn clip_rect(&self) -> Rect {
        self.clip_rect
    }

    /// The cell being painted.
    pub fn cell(&self) -> &Arc<CellContext> {
        &self.cell
    }
}

impl Deref for CellPaintArgs {
    type Target = CellContext;

    fn deref(&self) -> &CellContext {
        &self.cell
    }
}

impl fmt::Debug for CellPaintArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellPaintArgs")
            .field("clip_rect", &self.clip_rect)
            .field("cell", &self.cell)
            .finish_non_exhaustive()
    }
}
