// Property-based tests for cell state notifications.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::sync::Arc;

use parking_lot::Mutex;
use proptest::prelude::*;
use trellis::cell::{CellContextOwner, CellItem, CellProperty, CellState};

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

fn arb_state() -> impl Strategy<Value = CellState> {
    (0u8..4).prop_map(CellState::from_bits_truncate)
}

fn recorded(owner: &CellContextOwner) -> Arc<Mutex<Vec<CellProperty>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let log_clone = log.clone();
    owner.on_property_changed(move |property| log_clone.lock().push(*property));
    log
}

fn count(log: &[CellProperty], property: CellProperty) -> usize {
    log.iter().filter(|p| **p == property).count()
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn notifications_match_actual_flips(
        initial in arb_state(),
        states in proptest::collection::vec(arb_state(), 0..32),
    ) {
        let owner = CellContextOwner::new(0, CellItem::none(), initial);
        let log = recorded(&owner);

        let mut previous = initial;
        let (mut changes, mut editing_flips, mut selected_flips) = (0, 0, 0);
        for state in &states {
            changes += usize::from(*state != previous);
            editing_flips += usize::from(state.is_editing() != previous.is_editing());
            selected_flips += usize::from(state.is_selected() != previous.is_selected());
            previous = *state;
            owner.set_state(*state);
        }

        let log = log.lock();
        prop_assert_eq!(count(&log, CellProperty::CellState), changes);
        prop_assert_eq!(count(&log, CellProperty::IsEditing), editing_flips);
        prop_assert_eq!(count(&log, CellProperty::IsSelected), selected_flips);
        prop_assert_eq!(log.len(), changes + editing_flips + selected_flips);
        prop_assert_eq!(owner.state(), previous);
    }

    #[test]
    fn reassigning_current_state_is_silent(state in arb_state()) {
        let owner = CellContextOwner::new(0, CellItem::none(), state);
        let log = recorded(&owner);

        owner.set_state(state);
        owner.set_editing(state.is_editing());
        owner.set_selected(state.is_selected());

        prop_assert!(log.lock().is_empty());
    }

    #[test]
    fn flags_round_trip_independently(
        initial in arb_state(),
        editing in any::<bool>(),
        selected in any::<bool>(),
    ) {
        let owner = CellContextOwner::new(0, CellItem::none(), initial);

        owner.set_editing(editing);
        prop_assert_eq!(owner.is_editing(), editing);
        prop_assert_eq!(owner.is_selected(), initial.is_selected());

        owner.set_selected(selected);
        prop_assert_eq!(owner.is_selected(), selected);
        prop_assert_eq!(owner.is_editing(), editing);
        prop_assert_eq!(owner.state().contains(CellState::EDITING), editing);
    }
}
