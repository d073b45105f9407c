//! Transient per-cell state flags.

use bitflags::bitflags;

bitflags! {
    /// State of a cell instance.
    ///
    /// The empty set is the normal state. Combine with bitwise OR:
    /// `CellState::SELECTED | CellState::EDITING`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellState: u8 {
        /// The cell's row is selected.
        const SELECTED = 1 << 0;
        /// The cell is in edit mode.
        const EDITING = 1 << 1;
    }
}

impl CellState {
    /// Normal state: neither selected nor editing.
    pub const NONE: Self = Self::empty();

    #[inline]
    pub fn is_selected(self) -> bool {
        self.contains(Self::SELECTED)
    }

    #[inline]
    pub fn is_editing(self) -> bool {
        self.contains(Self::EDITING)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_normal_state() {
        assert_eq!(CellState::default(), CellState::NONE);
        assert!(!CellState::NONE.is_selected());
        assert!(!CellState::NONE.is_editing());
    }

    #[test]
    fn test_flags_compose() {
        let state = CellState::SELECTED | CellState::EDITING;
        assert!(state.is_selected());
        assert!(state.is_editing());
        assert_eq!(state - CellState::EDITING, CellState::SELECTED);
    }
}
