//! Custom cells: caller-supplied content for a grid column.
//!
//! [`CustomCell`] is the extensible cell definition. It exposes five
//! operations through the [`CellProvider`] trait; each one first consults an
//! assignable strategy [`Slot`] and falls back to a fixed default when the
//! slot is unset:
//!
//! | Operation | Default |
//! |---|---|
//! | [`on_create_cell`](CellProvider::on_create_cell) | no content |
//! | [`on_get_identifier`](CellProvider::on_get_identifier) | no identifier |
//! | [`on_get_preferred_width`](CellProvider::on_get_preferred_width) | [`DEFAULT_WIDTH`] |
//! | [`on_configure_cell`](CellProvider::on_configure_cell) | rebind the control's data context to the row item |
//! | [`on_paint`](CellProvider::on_paint) | raise the paint channel (no-op without observers) |
//!
//! Types that need structural control implement [`CellProvider`] themselves,
//! overriding only the operations they care about.
//!
//! # Rendering modes
//!
//! When the backend supports control views
//! ([`CustomCell::supports_control_view`]), controls are created and
//! configured for every visible cell. Otherwise only cells in edit mode get a
//! control and every other cell is painted through the paint channel. In
//! that mode recycling identifiers only matter for edited cells.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use trellis::cell::{CellContext, CellItem, CellProvider, CellState, CustomCell};
//!
//! let cell = CustomCell::new()
//!     .with_identifier(|args| {
//!         args.item()
//!             .downcast_ref::<String>()
//!             .map(|_| "text".to_string())
//!     })
//!     .with_preferred_width(|args| if args.is_editing() { 120.0 } else { 60.0 });
//!
//! let args = CellContext::new(0, CellItem::new("hello".to_string()), CellState::NONE);
//! assert_eq!(cell.on_get_identifier(&args).as_deref(), Some("text"));
//! assert_eq!(cell.on_get_preferred_width(&args), 60.0);
//! assert!(cell.on_create_cell(&args).is_none());
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use trellis_core::{ConnectionId, Signal};

use super::TARGET;
use super::context::CellContext;
use super::control::{Control, ControlHandle};
use super::paint::CellPaintArgs;
use crate::platform;

/// Preferred width reported when no width strategy is assigned.
pub const DEFAULT_WIDTH: f32 = 80.0;

/// Strategy creating the content of a cell.
pub type CreateCellFn = dyn Fn(&CellContext) -> Option<ControlHandle> + Send + Sync;
/// Strategy choosing the recycling identifier of a cell.
pub type GetIdentifierFn = dyn Fn(&CellContext) -> Option<String> + Send + Sync;
/// Strategy computing the preferred width of a cell.
pub type PreferredWidthFn = dyn Fn(&CellContext) -> f32 + Send + Sync;
/// Strategy reconfiguring recycled content for another row.
pub type ConfigureCellFn = dyn Fn(&CellContext, Option<&ControlHandle>) + Send + Sync;

/// An optional strategy: either an assigned closure or the built-in default.
pub enum Slot<F: ?Sized> {
    /// Use the assigned closure.
    Assigned(Arc<F>),
    /// Use the operation's default behavior.
    Default,
}

impl<F: ?Sized> Slot<F> {
    /// The assigned closure, if any.
    pub fn get(&self) -> Option<Arc<F>> {
        match self {
            Self::Assigned(f) => Some(f.clone()),
            Self::Default => None,
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, Self::Assigned(_))
    }
}

impl<F: ?Sized> Default for Slot<F> {
    fn default() -> Self {
        Self::Default
    }
}

impl<F: ?Sized> Clone for Slot<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Assigned(f) => Self::Assigned(f.clone()),
            Self::Default => Self::Default,
        }
    }
}

impl<F: ?Sized> fmt::Debug for Slot<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assigned(_) => f.write_str("Assigned"),
            Self::Default => f.write_str("Default"),
        }
    }
}

/// The overridable operations of a cell definition.
///
/// The host grid never calls these directly; it goes through a
/// [`CellCallback`](super::CellCallback), which runs them on the owning
/// thread. Every method has the default behavior of an unconfigured cell.
pub trait CellProvider: Send + Sync {
    /// Create the content for a cell.
    ///
    /// Called roughly once per visible (or cached) cell. Providers that
    /// create different kinds of content per row must also implement
    /// [`on_get_identifier`](Self::on_get_identifier).
    fn on_create_cell(&self, _args: &CellContext) -> Option<ControlHandle> {
        None
    }

    /// The recycling identifier for a cell's content.
    ///
    /// Each distinct content shape needs its own identifier so the host can
    /// pool and reuse content correctly.
    fn on_get_identifier(&self, _args: &CellContext) -> Option<String> {
        None
    }

    /// The preferred width of a cell.
    fn on_get_preferred_width(&self, _args: &CellContext) -> f32 {
        DEFAULT_WIDTH
    }

    /// Prepare existing content for another row or changed data.
    fn on_configure_cell(&self, args: &CellContext, control: Option<&ControlHandle>) {
        rebind_data_context(args, control);
    }

    /// Paint a cell that has no materialized content.
    fn on_paint(&self, _args: &CellPaintArgs) {}
}

/// Default reconfiguration: bind the control to the row's item.
pub fn rebind_data_context(args: &CellContext, control: Option<&ControlHandle>) {
    if let Some(control) = control {
        control.set_data_context(args.item());
    }
}

/// A cell whose content is supplied by assignable strategies.
#[derive(Default)]
pub struct CustomCell {
    create_cell: RwLock<Slot<CreateCellFn>>,
    get_identifier: RwLock<Slot<GetIdentifierFn>>,
    get_preferred_width: RwLock<Slot<PreferredWidthFn>>,
    configure_cell: RwLock<Slot<ConfigureCellFn>>,
    paint: OnceLock<Signal<CellPaintArgs>>,
}

impl CustomCell {
    /// Create a cell with every strategy unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cell whose content is a default-constructed `T`.
    pub fn create<T>() -> Self
    where
        T: Control + Default,
    {
        Self::new().with_create_cell(|_| Some(Arc::new(T::default()) as ControlHandle))
    }

    /// Whether the active backend can show controls outside edit mode.
    pub fn supports_control_view() -> bool {
        platform::supports_control_view()
    }

    /// Set the content-creation strategy.
    pub fn with_create_cell<F>(self, f: F) -> Self
    where
        F: Fn(&CellContext) -> Option<ControlHandle> + Send + Sync + 'static,
    {
        self.set_create_cell(f);
        self
    }

    /// Set the recycling-identifier strategy.
    pub fn with_identifier<F>(self, f: F) -> Self
    where
        F: Fn(&CellContext) -> Option<String> + Send + Sync + 'static,
    {
        self.set_identifier(f);
        self
    }

    /// Set the preferred-width strategy.
    pub fn with_preferred_width<F>(self, f: F) -> Self
    where
        F: Fn(&CellContext) -> f32 + Send + Sync + 'static,
    {
        self.set_preferred_width(f);
        self
    }

    /// Set the reconfiguration strategy.
    pub fn with_configure_cell<F>(self, f: F) -> Self
    where
        F: Fn(&CellContext, Option<&ControlHandle>) + Send + Sync + 'static,
    {
        self.set_configure_cell(f);
        self
    }

    pub fn set_create_cell<F>(&self, f: F)
    where
        F: Fn(&CellContext) -> Option<ControlHandle> + Send + Sync + 'static,
    {
        *self.create_cell.write() = Slot::Assigned(Arc::new(f));
    }

    pub fn set_identifier<F>(&self, f: F)
    where
        F: Fn(&CellContext) -> Option<String> + Send + Sync + 'static,
    {
        *self.get_identifier.write() = Slot::Assigned(Arc::new(f));
    }

    pub fn set_preferred_width<F>(&self, f: F)
    where
        F: Fn(&CellContext) -> f32 + Send + Sync + 'static,
    {
        *self.get_preferred_width.write() = Slot::Assigned(Arc::new(f));
    }

    pub fn set_configure_cell<F>(&self, f: F)
    where
        F: Fn(&CellContext, Option<&ControlHandle>) + Send + Sync + 'static,
    {
        *self.configure_cell.write() = Slot::Assigned(Arc::new(f));
    }

    /// Revert content creation to its default.
    pub fn clear_create_cell(&self) {
        *self.create_cell.write() = Slot::Default;
    }

    /// Revert the recycling identifier to its default.
    pub fn clear_identifier(&self) {
        *self.get_identifier.write() = Slot::Default;
    }

    /// Revert the preferred width to its default.
    pub fn clear_preferred_width(&self) {
        *self.get_preferred_width.write() = Slot::Default;
    }

    /// Revert reconfiguration to its default.
    pub fn clear_configure_cell(&self) {
        *self.configure_cell.write() = Slot::Default;
    }

    /// Subscribe to the paint channel.
    ///
    /// Observers run in subscription order, on the owning thread, for every
    /// cell that is painted rather than materialized.
    pub fn on_paint_event<F>(&self, observer: F) -> ConnectionId
    where
        F: Fn(&CellPaintArgs) + Send + Sync + 'static,
    {
        self.paint.get_or_init(Signal::new).connect(observer)
    }

    /// Unsubscribe a paint observer. Returns `false` if it was not subscribed.
    pub fn remove_paint_handler(&self, id: ConnectionId) -> bool {
        self.paint.get().is_some_and(|paint| paint.disconnect(id))
    }

    /// Number of paint observers.
    pub fn paint_handler_count(&self) -> usize {
        self.paint.get().map_or(0, Signal::connection_count)
    }

    /// Raise the paint channel.
    pub fn raise_paint(&self, args: &CellPaintArgs) {
        match self.paint.get() {
            Some(paint) => paint.emit(args.clone()),
            None => tracing::trace!(target: TARGET, row = args.row(), "no paint observers"),
        }
    }
}

impl CellProvider for CustomCell {
    fn on_create_cell(&self, args: &CellContext) -> Option<ControlHandle> {
        let slot = self.create_cell.read().get();
        slot.and_then(|create| create(args))
    }

    fn on_get_identifier(&self, args: &CellContext) -> Option<String> {
        let slot = self.get_identifier.read().get();
        slot.and_then(|identify| identify(args))
    }

    fn on_get_preferred_width(&self, args: &CellContext) -> f32 {
        let slot = self.get_preferred_width.read().get();
        match slot {
            Some(measure) => measure(args),
            None => DEFAULT_WIDTH,
        }
    }

    fn on_configure_cell(&self, args: &CellContext, control: Option<&ControlHandle>) {
        let slot = self.configure_cell.read().get();
        match slot {
            Some(configure) => configure(args, control),
            None => rebind_data_context(args, control),
        }
    }

    fn on_paint(&self, args: &CellPaintArgs) {
        self.raise_paint(args);
    }
}

impl fmt::Debug for CustomCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomCell")
            .field("create_cell", &*self.create_cell.read())
            .field("get_identifier", &*self.get_identifier.read())
            .field("get_preferred_width", &*self.get_preferred_width.read())
            .field("configure_cell", &*self.configure_cell.read())
            .field("paint_handlers", &self.paint_handler_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::any::Any;

    use parking_lot::Mutex;

    use crate::cell::{CellItem, CellState, DataContext};
    use crate::drawing::{Color, Graphics, Point, Rect};

    #[derive(Default)]
    struct Label {
        context: DataContext,
    }

    impl Control for Label {
        fn data_context(&self) -> CellItem {
            self.context.get()
        }

        fn set_data_context(&self, item: CellItem) {
            self.context.set(item);
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    struct NullGraphics;

    impl Graphics for NullGraphics {
        fn fill_rect(&self, _rect: Rect, _color: Color) {}
        fn draw_text(&self, _origin: Point, _text: &str, _color: Color) {}
    }

    fn paint_args(row: usize) -> CellPaintArgs {
        CellPaintArgs::new(
            Arc::new(NullGraphics),
            Rect::new(0.0, 0.0, 80.0, 20.0),
            Arc::new(CellContext::new(row, CellItem::none(), CellState::NONE)),
        )
    }

    #[test]
    fn test_unset_slots_use_defaults() {
        let cell = CustomCell::new();
        let item = CellItem::new(42_u32);
        let args = CellContext::new(1, item.clone(), CellState::NONE);

        assert!(cell.on_create_cell(&args).is_none());
        assert!(cell.on_get_identifier(&args).is_none());
        assert_eq!(cell.on_get_preferred_width(&args), DEFAULT_WIDTH);

        let control: ControlHandle = Arc::new(Label::default());
        cell.on_configure_cell(&args, Some(&control));
        assert_eq!(control.data_context(), item);

        // No control: nothing to do, nothing to fail.
        cell.on_configure_cell(&args, None);
        cell.on_paint(&paint_args(1));
    }

    #[test]
    fn test_assigned_slots_take_precedence() {
        let configured = Arc::new(Mutex::new(Vec::new()));
        let configured_clone = configured.clone();

        let cell = CustomCell::new()
            .with_identifier(|args| Some(format!("row-{}", args.row() % 2)))
            .with_preferred_width(|_| 140.0)
            .with_configure_cell(move |args, control| {
                configured_clone.lock().push((args.row(), control.is_some()));
            });

        let args = CellContext::new(3, CellItem::new(()), CellState::NONE);
        let control: ControlHandle = Arc::new(Label::default());

        assert_eq!(cell.on_get_identifier(&args).as_deref(), Some("row-1"));
        assert_eq!(cell.on_get_preferred_width(&args), 140.0);
        cell.on_configure_cell(&args, Some(&control));

        assert_eq!(*configured.lock(), vec![(3, true)]);
        // The assigned strategy replaced the default rebinding.
        assert!(control.data_context().is_none());
    }

    #[test]
    fn test_clearing_slot_restores_default() {
        let cell = CustomCell::new().with_preferred_width(|_| 10.0);
        let args = CellContext::default();

        assert_eq!(cell.on_get_preferred_width(&args), 10.0);
        cell.clear_preferred_width();
        assert_eq!(cell.on_get_preferred_width(&args), DEFAULT_WIDTH);
    }

    #[test]
    fn test_create_instantiates_default_control() {
        let cell = CustomCell::create::<Label>();
        let args = CellContext::default();

        let first = cell.on_create_cell(&args).unwrap();
        let second = cell.on_create_cell(&args).unwrap();

        assert!(crate::cell::downcast_control::<Label>(&first).is_some());
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_paint_channel_is_lazy() {
        let cell = CustomCell::new();
        assert_eq!(cell.paint_handler_count(), 0);
        assert!(cell.paint.get().is_none());

        let rows = Arc::new(Mutex::new(Vec::new()));
        let rows_clone = rows.clone();
        let id = cell.on_paint_event(move |args| rows_clone.lock().push(args.row()));
        assert_eq!(cell.paint_handler_count(), 1);

        cell.on_paint(&paint_args(4));
        assert!(cell.remove_paint_handler(id));
        assert!(!cell.remove_paint_handler(id));
        cell.on_paint(&paint_args(5));

        assert_eq!(*rows.lock(), vec![4]);
    }

    #[test]
    fn test_slot_debug() {
        let cell = CustomCell::new().with_identifier(|_| None);
        let rendered = format!("{cell:?}");
        assert!(rendered.contains("get_identifier: Assigned"));
        assert!(rendered.contains("create_cell: Default"));
    }
}
