#![forbid(unsafe_code)]

//! Viewport sizing: how many cells cover the screen.
//!
//! `cols = ceil(width / stride) + overdraw`, and likewise for rows. With
//! the wrap origin at `-stride`, that leaves one spare cell before the
//! leading edge and at least `overdraw - 1` after the trailing edge, so a
//! fast pan never exposes a gap.
//!
//! [`ViewportSizer::resize`] only rebuilds when the cell grid actually
//! changes shape; resizing to the same dimensions is a no-op.

use std::fmt;

use folio_core::{Size, Vec2};

use crate::config::GridConfig;
use crate::wrap::WrapSpace;

/// Stable identity of a grid slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellId {
    pub row: u32,
    pub col: u32,
}

impl CellId {
    #[must_use]
    pub const fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

/// Column and row count of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridDims {
    pub cols: u32,
    pub rows: u32,
}

impl GridDims {
    /// Dimensions needed to cover `viewport` with the configured overdraw.
    #[must_use]
    pub fn for_viewport(viewport: Size, grid: &GridConfig) -> Self {
        let stride = grid.stride();
        let cover = |extent: u32| (f64::from(extent) / stride).ceil() as u32;
        Self {
            cols: cover(viewport.width).saturating_add(grid.overdraw),
            rows: cover(viewport.height).saturating_add(grid.overdraw),
        }
    }

    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Total pixel span of the grid on each axis.
    #[must_use]
    pub fn span(&self, stride: f64) -> Vec2 {
        Vec2::new(f64::from(self.cols) * stride, f64::from(self.rows) * stride)
    }
}

/// One slot of the laid-out grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSlot {
    pub id: CellId,
    /// Column in grid units.
    pub rel_x: u32,
    /// Row in grid units.
    pub rel_y: u32,
    /// Row-major position, also the slot's index into the image pool.
    pub index: usize,
}

impl CellSlot {
    /// Unwrapped top-left corner in px.
    #[must_use]
    pub fn base(&self, stride: f64) -> Vec2 {
        Vec2::new(f64::from(self.rel_x) * stride, f64::from(self.rel_y) * stride)
    }
}

/// Slots for a given grid shape, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLayout {
    dims: GridDims,
    stride: f64,
    slots: Vec<CellSlot>,
}

impl GridLayout {
    #[must_use]
    pub fn new(dims: GridDims, stride: f64) -> Self {
        let mut slots = Vec::with_capacity(dims.cell_count());
        for row in 0..dims.rows {
            for col in 0..dims.cols {
                slots.push(CellSlot {
                    id: CellId::new(row, col),
                    rel_x: col,
                    rel_y: row,
                    index: slots.len(),
                });
            }
        }
        Self {
            dims,
            stride,
            slots,
        }
    }

    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.dims
    }

    #[must_use]
    pub fn stride(&self) -> f64 {
        self.stride
    }

    #[must_use]
    pub fn slots(&self) -> &[CellSlot] {
        &self.slots
    }

    #[must_use]
    pub fn wrap_space(&self) -> WrapSpace {
        WrapSpace::new(self.dims.span(self.stride), self.stride)
    }
}

/// Result of a resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeOutcome {
    /// Same grid shape; nothing was regenerated.
    Unchanged,
    /// The slot list was regenerated.
    Rebuilt { previous: GridDims, dims: GridDims },
}

impl ResizeOutcome {
    #[must_use]
    pub fn is_rebuilt(&self) -> bool {
        matches!(self, Self::Rebuilt { .. })
    }
}

/// Tracks the viewport and keeps the layout in step with it.
#[derive(Debug, Clone)]
pub struct ViewportSizer {
    grid: GridConfig,
    viewport: Size,
    layout: GridLayout,
}

impl ViewportSizer {
    #[must_use]
    pub fn new(viewport: Size, grid: GridConfig) -> Self {
        let dims = GridDims::for_viewport(viewport, &grid);
        let layout = GridLayout::new(dims, grid.stride());
        tracing::debug!(
            target: "folio.gallery",
            width = viewport.width,
            height = viewport.height,
            cols = dims.cols,
            rows = dims.rows,
            "initial grid layout"
        );
        Self {
            grid,
            viewport,
            layout,
        }
    }

    /// Apply a viewport size. Regenerates the layout only if the grid shape
    /// changes.
    pub fn resize(&mut self, viewport: Size) -> ResizeOutcome {
        self.viewport = viewport;
        let dims = GridDims::for_viewport(viewport, &self.grid);
        let previous = self.layout.dims();
        if dims == previous {
            return ResizeOutcome::Unchanged;
        }

        self.layout = GridLayout::new(dims, self.grid.stride());
        tracing::debug!(
            target: "folio.gallery",
            width = viewport.width,
            height = viewport.height,
            cols = dims.cols,
            rows = dims.rows,
            prev_cols = previous.cols,
            prev_rows = previous.rows,
            "grid layout rebuilt"
        );
        ResizeOutcome::Rebuilt { previous, dims }
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[must_use]
    pub fn dims(&self) -> GridDims {
        self.layout.dims()
    }
}
