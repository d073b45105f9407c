//! Trellis: virtualized custom cell content for grid and table views.
//!
//! A grid that displays thousands of rows can only afford a few live visual
//! objects. This crate lets a caller supply arbitrary per-row content for a
//! grid column while the hosting grid displays, recycles and edits rows:
//!
//! - decide per cell whether to paint directly or materialize a control
//!   ([`platform::supports_control_view`], [`cell::CellCallback::present`])
//! - recycle controls by identifier and rebind them to new rows
//!   ([`cell::CellProvider::on_configure_cell`])
//! - publish cell state as structured change notifications
//!   ([`cell::CellProperty`])
//! - run every content callback on the thread owning the surface
//!   ([`trellis_core::Dispatcher`])
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::cell::{CellCallback, CellContext, CellItem, CellState, CustomCell};
//! use trellis::drawing::{Graphics, Rect};
//! use trellis_core::Dispatcher;
//!
//! # struct Surface;
//! # impl Graphics for Surface {
//! #     fn fill_rect(&self, _: Rect, _: trellis::drawing::Color) {}
//! #     fn draw_text(&self, _: trellis::drawing::Point, _: &str, _: trellis::drawing::Color) {}
//! # }
//! let dispatcher = Dispatcher::new();
//! // A backend that can only host controls while editing.
//! let callback = CellCallback::with_control_view(dispatcher.handle(), false);
//!
//! let cell = Arc::new(CustomCell::new());
//! cell.on_paint_event(|args| {
//!     args.graphics().fill_rect(args.clip_rect(), args.text_color());
//! });
//!
//! let graphics: Arc<dyn Graphics> = Arc::new(Surface);
//! let args = Arc::new(CellContext::new(0, CellItem::new("row 0"), CellState::NONE));
//! let shown = callback
//!     .present(&cell, &args, &graphics, Rect::new(0.0, 0.0, 80.0, 20.0), |_| None)
//!     .unwrap();
//! assert!(!shown.is_materialized());
//! ```

pub mod cell;
pub mod drawing;
mod error;
pub mod platform;

pub use error::{CellError, Result};
pub use platform::{PlatformError, PlatformFeatures, RenderBackend};

static_assertions::assert_impl_all!(cell::CellContext: Send, Sync);
static_assertions::assert_impl_all!(cell::CustomCell: Send, Sync);
static_assertions::assert_impl_all!(cell::CellPaintArgs: Send, Sync, Clone);
static_assertions::assert_impl_all!(cell::CellCallback: Send, Sync, Clone);
