//! The bridge the host grid calls into.
//!
//! [`CellCallback`] is the narrow surface a grid widget uses to drive a cell
//! provider. Every call is marshaled onto the thread that owns the rendering
//! surface through a single [`DispatchHandle`], and only then reaches the
//! provider's overridable [`CellProvider`] operation (which in turn consults
//! its strategy slot). Calls already on the owning thread run inline.
//!
//! Provider panics are not caught here: they surface on the calling thread
//! with their original payload. The only error these methods return is
//! [`CellError::Dispatch`](crate::CellError::Dispatch), when the owning
//! thread's dispatcher has shut down.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::cell::{CellCallback, CellContext, CellItem, CellState, CustomCell};
//! use trellis_core::Dispatcher;
//!
//! let dispatcher = Dispatcher::new();
//! let callback = CellCallback::with_control_view(dispatcher.handle(), true);
//! let cell = Arc::new(CustomCell::new().with_preferred_width(|_| 42.0));
//! let args = Arc::new(CellContext::new(0, CellItem::none(), CellState::NONE));
//!
//! assert_eq!(callback.on_get_preferred_width(&cell, &args).unwrap(), 42.0);
//! ```

use std::fmt;
use std::sync::Arc;

use trellis_core::{DispatchHandle, PerfSpan};

use super::TARGET;
use super::context::CellContext;
use super::control::ControlHandle;
use super::custom_cell::CellProvider;
use super::paint::CellPaintArgs;
use crate::drawing::{Graphics, Rect};
use crate::error::Result;
use crate::platform;

/// How a cell ended up being presented.
pub enum CellPresentation {
    /// The cell is shown by a live control.
    Materialized {
        /// The recycling identifier the control is pooled under.
        identifier: Option<String>,
        /// The control, or `None` if the provider produced no content.
        control: Option<ControlHandle>,
        /// Whether the control was created for this call rather than taken
        /// from the pool.
        created: bool,
    },
    /// The cell was drawn through the paint channel.
    Painted,
}

impl CellPresentation {
    pub fn is_materialized(&self) -> bool {
        matches!(self, Self::Materialized { .. })
    }

    /// The control, for materialized cells.
    pub fn control(&self) -> Option<&ControlHandle> {
        match self {
            Self::Materialized { control, .. } => control.as_ref(),
            Self::Painted => None,
        }
    }
}

impl fmt::Debug for CellPresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Materialized {
                identifier,
                control,
                created,
            } => f
                .debug_struct("Materialized")
                .field("identifier", identifier)
                .field("has_control", &control.is_some())
                .field("created", created)
                .finish(),
            Self::Painted => f.write_str("Painted"),
        }
    }
}

/// Marshals cell provider operations onto the owning thread.
#[derive(Clone)]
pub struct CellCallback {
    dispatcher: DispatchHandle,
    supports_control_view: bool,
}

impl CellCallback {
    /// Create a bridge using the process backend's control-view capability.
    pub fn new(dispatcher: DispatchHandle) -> Self {
        Self::with_control_view(dispatcher, platform::supports_control_view())
    }

    /// Create a bridge with an explicit control-view capability.
    pub fn with_control_view(dispatcher: DispatchHandle, supports_control_view: bool) -> Self {
        Self {
            dispatcher,
            supports_control_view,
        }
    }

    /// The dispatcher calls are marshaled through.
    pub fn dispatcher(&self) -> &DispatchHandle {
        &self.dispatcher
    }

    pub fn supports_control_view(&self) -> bool {
        self.supports_control_view
    }

    /// Whether a cell in this context is shown by a control (as opposed to
    /// painted).
    pub fn uses_control(&self, args: &CellContext) -> bool {
        self.supports_control_view || args.is_editing()
    }

    /// Get the preferred width of a cell.
    pub fn on_get_preferred_width<P>(&self, widget: &Arc<P>, args: &Arc<CellContext>) -> Result<f32>
    where
        P: CellProvider + ?Sized + 'static,
    {
        let (widget, args) = (widget.clone(), args.clone());
        self.invoke("get_preferred_width", move || widget.on_get_preferred_width(&args))
    }

    /// Get the recycling identifier of a cell.
    pub fn on_get_identifier<P>(
        &self,
        widget: &Arc<P>,
        args: &Arc<CellContext>,
    ) -> Result<Option<String>>
    where
        P: CellProvider + ?Sized + 'static,
    {
        let (widget, args) = (widget.clone(), args.clone());
        self.invoke("get_identifier", move || widget.on_get_identifier(&args))
    }

    /// Reconfigure existing content for a cell.
    pub fn on_configure_cell<P>(
        &self,
        widget: &Arc<P>,
        args: &Arc<CellContext>,
        control: Option<ControlHandle>,
    ) -> Result<()>
    where
        P: CellProvider + ?Sized + 'static,
    {
        let (widget, args) = (widget.clone(), args.clone());
        self.invoke("configure_cell", move || {
            widget.on_configure_cell(&args, control.as_ref())
        })
    }

    /// Create content for a cell.
    pub fn on_create_cell<P>(
        &self,
        widget: &Arc<P>,
        args: &Arc<CellContext>,
    ) -> Result<Option<ControlHandle>>
    where
        P: CellProvider + ?Sized + 'static,
    {
        let (widget, args) = (widget.clone(), args.clone());
        self.invoke("create_cell", move || widget.on_create_cell(&args))
    }

    /// Paint a cell.
    pub fn on_paint<P>(&self, widget: &Arc<P>, args: CellPaintArgs) -> Result<()>
    where
        P: CellProvider + ?Sized + 'static,
    {
        let widget = widget.clone();
        self.invoke("paint", move || widget.on_paint(&args))
    }

    /// Present one cell, choosing between a control and the paint channel.
    ///
    /// When the cell uses a control, its identifier is requested first and
    /// `take_pooled` is asked for pooled content under that identifier. The
    /// pool must only return content created under the same identifier. If
    /// it has none, content is created. The content is then configured for
    /// this cell. Otherwise the cell is painted on `graphics` within
    /// `clip_rect`, and no identifier is requested.
    pub fn present<P, L>(
        &self,
        widget: &Arc<P>,
        args: &Arc<CellContext>,
        graphics: &Arc<dyn Graphics>,
        clip_rect: Rect,
        take_pooled: L,
    ) -> Result<CellPresentation>
    where
        P: CellProvider + ?Sized + 'static,
        L: FnOnce(Option<&str>) -> Option<ControlHandle>,
    {
        if !self.uses_control(args) {
            let paint = CellPaintArgs::new(graphics.clone(), clip_rect, args.clone());
            self.on_paint(widget, paint)?;
            return Ok(CellPresentation::Painted);
        }

        let identifier = self.on_get_identifier(widget, args)?;
        let (control, created) = match take_pooled(identifier.as_deref()) {
            Some(pooled) => (Some(pooled), false),
            None => (self.on_create_cell(widget, args)?, true),
        };
        self.on_configure_cell(widget, args, control.clone())?;

        tracing::trace!(
            target: TARGET,
            row = args.row(),
            identifier = identifier.as_deref().unwrap_or(""),
            created,
            "cell materialized"
        );
        Ok(CellPresentation::Materialized {
            identifier,
            control,
            created,
        })
    }

    fn invoke<F, R>(&self, operation: &'static str, f: F) -> Result<R>
    where
        F: FnOnce() -> R + Send + 'static,
        R: Send + 'static,
    {
        let _span = PerfSpan::new(operation);
        tracing::trace!(
            target: TARGET,
            operation,
            inline = self.dispatcher.is_owner_thread(),
            "cell callback"
        );
        Ok(self.dispatcher.invoke(f)?)
    }
}

impl fmt::Debug for CellCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellCallback")
            .field("dispatcher", &self.dispatcher)
            .field("supports_control_view", &self.supports_control_view)
            .finish()
    }
}
