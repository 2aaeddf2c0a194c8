// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

fn state_with_available(counts: IngredientCounts) -> SharedState {
    SharedState {
        available: counts,
        ..SharedState::default()
    }
}

#[test]
fn new_state_is_zeroed() {
    let state = SharedState::new();
    assert_eq!(state.available.total(), 0);
    assert_eq!(state.reserved.total(), 0);
    assert!(!state.closing);
    assert_eq!(state.watcher_status.tobacco, WatcherStatus::Waiting);
}

#[test]
fn single_ingredient_has_no_winner() {
    let mut state = SharedState::new();
    state.put(Ingredient::Tobacco);

    let winner = state.update_reservations(Ingredient::Tobacco);

    assert_eq!(winner, None);
    assert_eq!(state.reserved, IngredientCounts::new(1, 0, 0));
}

#[test]
fn tobacco_then_paper_wakes_matches_smoker() {
    let mut state = SharedState::new();
    state.put(Ingredient::Tobacco);
    state.put(Ingredient::Paper);

    // Only the calling watcher's slot is refreshed
    assert_eq!(state.update_reservations(Ingredient::Tobacco), None);
    assert_eq!(state.reserved, IngredientCounts::new(1, 0, 0));

    let winner = state.update_reservations(Ingredient::Paper);

    assert_eq!(winner, Some(SmokerId(Ingredient::Matches)));
    assert_eq!(state.reserved, IngredientCounts::new(0, 0, 0));
    assert_eq!(state.available, IngredientCounts::new(1, 1, 0));
}

#[test]
fn put_counts_offered_units_beyond_takes() {
    let mut state = SharedState::new();
    state.put(Ingredient::Paper);
    state.put(Ingredient::Paper);
    state.take(Ingredient::Paper).unwrap();

    assert_eq!(state.available, IngredientCounts::new(0, 1, 0));
    assert_eq!(state.offered, IngredientCounts::new(0, 2, 0));
}

#[test]
fn order_of_updates_does_not_change_winner() {
    let mut state = SharedState::new();
    state.put(Ingredient::Matches);
    state.put(Ingredient::Paper);

    assert_eq!(state.update_reservations(Ingredient::Paper), None);
    assert_eq!(
        state.update_reservations(Ingredient::Matches),
        Some(SmokerId(Ingredient::Tobacco))
    );
}

#[test]
fn only_first_pair_is_committed_per_update() {
    let mut state = state_with_available(IngredientCounts::new(1, 1, 1));
    state.reserved = IngredientCounts::new(1, 1, 1);

    let winner = state.update_reservations(Ingredient::Tobacco);

    assert_eq!(winner, Some(SmokerId(Ingredient::Matches)));
    assert_eq!(state.reserved, IngredientCounts::new(0, 0, 1));
}

#[test]
fn leftover_reservation_is_committed_by_later_update() {
    let mut state = state_with_available(IngredientCounts::new(2, 1, 1));
    state.reserved = IngredientCounts::new(1, 1, 1);

    assert_eq!(
        state.update_reservations(Ingredient::Tobacco),
        Some(SmokerId(Ingredient::Matches))
    );
    assert_eq!(state.reserved, IngredientCounts::new(1, 0, 1));

    assert_eq!(
        state.update_reservations(Ingredient::Matches),
        Some(SmokerId(Ingredient::Paper))
    );
    assert_eq!(state.reserved, IngredientCounts::new(0, 0, 0));
}

#[test]
fn queued_pairs_are_each_committed_once() {
    let mut state = SharedState::new();
    for _ in 0..2 {
        state.put(Ingredient::Tobacco);
        state.put(Ingredient::Paper);
    }

    let winners: Vec<_> = [
        Ingredient::Tobacco,
        Ingredient::Paper,
        Ingredient::Tobacco,
        Ingredient::Paper,
    ]
    .into_iter()
    .filter_map(|id| state.update_reservations(id))
    .collect();

    assert_eq!(winners, vec![SmokerId(Ingredient::Matches); 2]);
    assert_eq!(state.reserved, IngredientCounts::default());
    assert_eq!(state.available, IngredientCounts::new(2, 2, 0));
}

#[test]
fn update_without_a_unit_on_the_table_reserves_nothing() {
    let mut state = SharedState::new();
    assert_eq!(state.update_reservations(Ingredient::Matches), None);
    assert_eq!(state.reserved, IngredientCounts::default());
}

#[test]
fn take_fails_on_empty_slot() {
    let mut state = SharedState::new();
    let err = state.take(Ingredient::Paper).unwrap_err();
    assert!(matches!(err, SyncError::Invariant { .. }));
    assert_eq!(state.available.paper, 0);
}

#[test]
fn take_decrements_available() {
    let mut state = SharedState::new();
    state.put(Ingredient::Paper);
    state.take(Ingredient::Paper).unwrap();
    assert_eq!(state.available.paper, 0);
}

#[test]
fn close_is_monotonic() {
    let mut state = SharedState::new();
    assert!(state.close());
    assert!(!state.close());
    assert!(state.closing);
}

#[test]
fn state_serializes_with_snake_case_statuses() {
    let mut state = SharedState::new();
    state.agent_status = AgentStatus::WaitingCigarette;
    state.smoker_status.paper = SmokerStatus::WaitingIngredients;

    let json = serde_json::to_value(&state).unwrap();

    assert_eq!(json["agent_status"], "waiting_cigarette");
    assert_eq!(json["smoker_status"]["paper"], "waiting_ingredients");
    assert_eq!(json["available"]["matches"], 0);
}

fn arb_ingredient() -> impl Strategy<Value = Ingredient> {
    prop_oneof![
        Just(Ingredient::Tobacco),
        Just(Ingredient::Paper),
        Just(Ingredient::Matches),
    ]
}

fn arb_consistent_state() -> impl Strategy<Value = SharedState> {
    (0..4u32, 0..4u32, 0..4u32, 0..4u32, 0..4u32, 0..4u32).prop_map(
        |(at, ap, am, rt, rp, rm)| SharedState {
            available: IngredientCounts::new(at, ap, am),
            reserved: IngredientCounts::new(rt.min(at), rp.min(ap), rm.min(am)),
            ..SharedState::default()
        },
    )
}

proptest! {
    #[test]
    fn update_commits_at_most_one_pair(state in arb_consistent_state(), id in arb_ingredient()) {
        let mut after = state.clone();
        let winner = after.update_reservations(id);

        // Baseline: the watcher's own slot absorbs one unit, capped by `available`
        let mut absorbed = state.clone();
        absorbed.reserved[id] = (absorbed.reserved[id] + 1).min(absorbed.available[id]);

        let decremented: Vec<_> = Ingredient::ALL
            .iter()
            .filter(|&&k| after.reserved[k] != absorbed.reserved[k])
            .collect();

        match winner {
            Some(smoker) => {
                prop_assert_eq!(decremented.len(), 2);
                for &&k in &decremented {
                    prop_assert_eq!(after.reserved[k] + 1, absorbed.reserved[k]);
                    prop_assert_ne!(k, smoker.holds());
                }
            }
            None => prop_assert!(decremented.is_empty()),
        }
        prop_assert_eq!(after.available, state.available);
    }

    #[test]
    fn update_keeps_reservations_within_available(
        state in arb_consistent_state(),
        ids in proptest::collection::vec(arb_ingredient(), 1..10),
    ) {
        let mut state = state;
        for id in ids {
            state.update_reservations(id);
            prop_assert!(state.reservations_consistent());
        }
    }
}
