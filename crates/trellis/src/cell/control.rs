//! Materialized cell content.
//!
//! A control is a live, stateful visual object that represents a cell. The
//! host grid pools controls by recycling identifier and hands them back to
//! the provider for reconfiguration when a row scrolls into view; the only
//! thing the cell system itself needs from a control is its *data context*,
//! the item it is currently bound to.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use trellis_core::{ConnectionId, Property, Signal};

use super::item::CellItem;

/// A visual object that can be hosted in a cell.
pub trait Control: Any + Send + Sync {
    /// The item this control is bound to.
    fn data_context(&self) -> CellItem;

    /// Rebind this control to another item.
    fn set_data_context(&self, item: CellItem);

    /// Get this as Any for downcasting.
    fn as_any(&self) -> &dyn Any;
}

/// A shared handle to materialized cell content.
pub type ControlHandle = Arc<dyn Control>;

/// Downcast a control handle to its concrete type.
pub fn downcast_control<T: Control>(control: &ControlHandle) -> Option<&T> {
    control.as_any().downcast_ref::<T>()
}

/// Data-context storage for controls to embed.
///
/// Emits `changed` whenever the bound item actually changes, so a control
/// can refresh itself when it is recycled onto another row.
///
/// ```
/// use std::any::Any;
/// use trellis::cell::{CellItem, Control, DataContext};
///
/// #[derive(Default)]
/// struct Badge {
///     context: DataContext,
/// }
///
/// impl Control for Badge {
///     fn data_context(&self) -> CellItem {
///         self.context.get()
///     }
///
///     fn set_data_context(&self, item: CellItem) {
///         self.context.set(item);
///     }
///
///     fn as_any(&self) -> &dyn Any {
///         self
///     }
/// }
///
/// let badge = Badge::default();
/// badge.set_data_context(CellItem::new(3_u8));
/// assert_eq!(badge.data_context().downcast_ref::<u8>(), Some(&3));
/// ```
#[derive(Default)]
pub struct DataContext {
    item: Property<CellItem>,
    changed: Signal<CellItem>,
}

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bound item.
    pub fn get(&self) -> CellItem {
        self.item.get()
    }

    /// Bind another item, emitting `changed` if it differs.
    pub fn set(&self, item: CellItem) {
        if self.item.set(item.clone()) {
            self.changed.emit(item);
        }
    }

    /// Subscribe to binding changes.
    pub fn on_changed<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&CellItem) + Send + Sync + 'static,
    {
        self.changed.connect(slot)
    }

    /// Signal emitted when the bound item changes.
    pub fn changed(&self) -> &Signal<CellItem> {
        &self.changed
    }
}

impl fmt::Debug for DataContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataContext")
            .field("item", &self.item.get())
            .finish()
    }
}
