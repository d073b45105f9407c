//! Virtualized custom cell content for grid views.
//!
//! A grid column backed by a [`CustomCell`] can display arbitrary per-row
//! content while the grid keeps only a handful of live controls around. The
//! pieces, leaves first:
//!
//! - [`CellState`] - selected/editing flags of a cell instance
//! - [`CellContext`] - row, item, state and text color, with structured
//!   [`CellProperty`] change notifications; written only through the grid's
//!   [`CellContextOwner`]
//! - [`Control`] / [`ControlHandle`] - materialized content and its data context
//! - [`CustomCell`] / [`CellProvider`] - the pluggable content strategies
//! - [`CellCallback`] - the bridge that runs every provider operation on the
//!   owning thread
//! - [`CellPaintArgs`] - arguments of the paint channel used when a cell is
//!   drawn instead of materialized
//!
//! # Flow
//!
//! ```text
//!  grid widget ──(row, item, state)──> CellContext
//!       │
//!       ▼
//!  CellCallback ──dispatch──> owning thread ──> CellProvider ──> Slot / default
//!       │
//!       ├── uses control? ── identifier ─> pool lookup ─> create? ─> configure
//!       └── otherwise ────── paint channel
//! ```

/// Log target for the cell system.
pub(crate) const TARGET: &str = "trellis::cell";

mod callback;
mod context;
mod control;
mod custom_cell;
mod item;
mod paint;
mod state;

pub use callback::{CellCallback, CellPresentation};
pub use context::{CellContext, CellContextOwner, CellProperty};
pub use control::{Control, ControlHandle, DataContext, downcast_control};
pub use custom_cell::{
    CellProvider, ConfigureCellFn, CreateCellFn, CustomCell, DEFAULT_WIDTH, GetIdentifierFn,
    PreferredWidthFn, Slot, rebind_data_context,
};
pub use item::CellItem;
pub use paint::CellPaintArgs;
pub use state::CellState;
