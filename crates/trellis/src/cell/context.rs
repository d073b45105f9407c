//! Per-invocation cell context.
//!
//! A [`CellContext`] describes one cell instance: its row, the row's backing
//! item, its transient [`CellState`] and the preferred text color. The host
//! grid owns the context through a [`CellContextOwner`], the only type with
//! setters; providers, controls and paint observers get the shared
//! `CellContext`, which they can read and observe but not change.
//!
//! Every mutation goes through a change-detecting setter, and every real
//! change is announced on [`CellContext::property_changed`] as a
//! [`CellProperty`]. Assigning a state emits [`CellProperty::CellState`]
//! followed by [`CellProperty::IsEditing`] and/or [`CellProperty::IsSelected`]
//! for each derived flag that flipped; assigning an identical state emits
//! nothing.

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use trellis_core::{ConnectionId, Property, Signal};

use super::TARGET;
use super::item::CellItem;
use super::state::CellState;
use crate::drawing::{Color, SystemColors};

/// A property of a [`CellContext`] that changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellProperty {
    /// The row index.
    Row,
    /// The backing item.
    Item,
    /// The full state bitset.
    CellState,
    /// The derived editing flag.
    IsEditing,
    /// The derived selected flag.
    IsSelected,
    /// The preferred text color.
    TextColor,
}

impl CellProperty {
    /// The property's name, as reported to data-binding observers.
    pub fn name(self) -> &'static str {
        match self {
            Self::Row => "Row",
            Self::Item => "Item",
            Self::CellState => "CellState",
            Self::IsEditing => "IsEditing",
            Self::IsSelected => "IsSelected",
            Self::TextColor => "CellTextColor",
        }
    }
}

impl fmt::Display for CellProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The row, item and state of a single cell instance.
pub struct CellContext {
    row: Property<usize>,
    item: Property<CellItem>,
    state: Property<CellState>,
    text_color: Property<Color>,
    property_changed: Signal<CellProperty>,
}

impl CellContext {
    /// Create a context for `row`, bound to `item`, in `state`.
    ///
    /// Values are applied through the regular setters. Nobody can observe
    /// the context before this returns, so construction emits nothing
    /// observable.
    pub fn new(row: usize, item: CellItem, state: CellState) -> Self {
        let context = Self {
            row: Property::new(0),
            item: Property::new(CellItem::none()),
            state: Property::new(CellState::NONE),
            text_color: Property::new(SystemColors::CONTROL_TEXT),
            property_changed: Signal::new(),
        };
        context.set_row(row);
        context.set_item(item);
        context.set_state(state);
        context
    }

    /// The row index of the cell.
    pub fn row(&self) -> usize {
        self.row.get()
    }

    /// The item the cell displays.
    pub fn item(&self) -> CellItem {
        self.item.get()
    }

    /// The cell's state bitset.
    pub fn state(&self) -> CellState {
        self.state.get()
    }

    /// The preferred color of cell text given its state.
    pub fn text_color(&self) -> Color {
        self.text_color.get()
    }

    /// Whether the cell is in edit mode.
    pub fn is_editing(&self) -> bool {
        self.state().is_editing()
    }

    /// Whether the cell's row is selected.
    pub fn is_selected(&self) -> bool {
        self.state().is_selected()
    }

    /// Move the context to another row.
    fn set_row(&self, row: usize) {
        if self.row.set(row) {
            self.notify(CellProperty::Row);
        }
    }

    /// Rebind the context to another item.
    fn set_item(&self, item: CellItem) {
        if self.item.set(item) {
            self.notify(CellProperty::Item);
        }
    }

    /// Assign the state bitset.
    ///
    /// This is the single place state changes are detected and announced.
    fn set_state(&self, state: CellState) {
        let Some(previous) = self.state.replace(state) else {
            return;
        };

        self.notify(CellProperty::CellState);
        if previous.is_editing() != state.is_editing() {
            self.notify(CellProperty::IsEditing);
        }
        if previous.is_selected() != state.is_selected() {
            self.notify(CellProperty::IsSelected);
        }
    }

    /// Set or clear the editing flag.
    fn set_editing(&self, editing: bool) {
        let mut state = self.state();
        state.set(CellState::EDITING, editing);
        self.set_state(state);
    }

    /// Set or clear the selected flag.
    fn set_selected(&self, selected: bool) {
        let mut state = self.state();
        state.set(CellState::SELECTED, selected);
        self.set_state(state);
    }

    /// Set the preferred text color.
    fn set_text_color(&self, color: Color) {
        if self.text_color.set(color) {
            self.notify(CellProperty::TextColor);
        }
    }

    /// Signal emitted once per changed property.
    pub fn property_changed(&self) -> &Signal<CellProperty> {
        &self.property_changed
    }

    /// Subscribe to property changes.
    pub fn on_property_changed<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&CellProperty) + Send + Sync + 'static,
    {
        self.property_changed.connect(slot)
    }

    fn notify(&self, property: CellProperty) {
        tracing::trace!(target: TARGET, %property, "cell property changed");
        self.property_changed.emit(property);
    }
}

impl Default for CellContext {
    fn default() -> Self {
        Self::new(0, CellItem::none(), CellState::NONE)
    }
}

impl fmt::Debug for CellContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CellContext")
            .field("row", &self.row())
            .field("item", &self.item())
            .field("state", &self.state())
            .field("text_color", &self.text_color())
            .finish()
    }
}

/// The host grid's write access to a [`CellContext`].
///
/// Hand [`context`](Self::context) to providers and observers; keep the owner.
/// Reads are available on the owner through `Deref`.
///
/// ```
/// use trellis::cell::{CellContextOwner, CellItem, CellProperty, CellState};
///
/// let owner = CellContextOwner::new(0, CellItem::none(), CellState::NONE);
/// let shared = owner.context().clone();
/// shared.on_property_changed(|property| assert_eq!(*property, CellProperty::Row));
///
/// owner.set_row(4);
/// assert_eq!(shared.row(), 4);
/// ```
///
/// The shared context cannot be mutated:
///
/// ```compile_fail
/// use trellis::cell::{CellContext, CellState};
///
/// fn observer(args: &CellContext) {
///     args.set_state(CellState::EDITING);
/// }
/// ```
#[derive(Debug, Default)]
pub struct CellContextOwner {
    context: Arc<CellContext>,
}

impl CellContextOwner {
    /// Create a context for `row`, bound to `item`, in `state`.
    pub fn new(row: usize, item: CellItem, state: CellState) -> Self {
        Self {
            context: Arc::new(CellContext::new(row, item, state)),
        }
    }

    /// The read-only context to pass to providers and observers.
    pub fn context(&self) -> &Arc<CellContext> {
        &self.context
    }

    /// Move the context to another row.
    pub fn set_row(&self, row: usize) {
        self.context.set_row(row);
    }

    /// Rebind the context to another item.
    pub fn set_item(&self, item: CellItem) {
        self.context.set_item(item);
    }

    /// Assign the state bitset, announcing the derived flags that flipped.
    pub fn set_state(&self, state: CellState) {
        self.context.set_state(state);
    }

    pub fn set_editing(&self, editing: bool) {
        self.context.set_editing(editing);
    }

    pub fn set_selected(&self, selected: bool) {
        self.context.set_selected(selected);
    }

    /// Set the preferred text color.
    pub fn set_text_color(&self, color: Color) {
        self.context.set_text_color(color);
    }
}

impl Deref for CellContextOwner {
    type Target = CellContext;

    fn deref(&self) -> &CellContext {
        &self.context
    }
}
