//! Property tests for state merging and save round trips.

use city_core::{GameState, StateStore};
use city_test_utils::fixtures::TempSaves;
use city_test_utils::strategies::{arb_city_name, arb_game_state, arb_services};
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn budget_update_changes_only_budget(initial in arb_game_state(), budget in any::<i64>()) {
        let store = StateStore::new(initial.clone());
        store.update(json!({"budget": budget})).unwrap();

        let expected = GameState { budget, ..initial };
        prop_assert_eq!(store.get(), expected);
    }

    #[test]
    fn services_update_replaces_services_only(initial in arb_game_state(), services in arb_services()) {
        let store = StateStore::new(initial.clone());
        store.update(json!({"services": services})).unwrap();

        let expected = GameState { services, ..initial };
        prop_assert_eq!(store.get(), expected);
    }

    #[test]
    fn saved_state_loads_back_unchanged(state in arb_game_state(), city in arb_city_name()) {
        let saves = TempSaves::new();
        saves.gateway.save(&city, &state).unwrap();

        let record = saves.gateway.load_most_recent(&city).unwrap();
        prop_assert_eq!(record.city_name, city);
        prop_assert_eq!(record.game_state, state);
    }
}
