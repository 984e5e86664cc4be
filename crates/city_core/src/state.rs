//! In-memory game state and the store that guards it.
//!
//! The server holds exactly one [`GameState`]. The browser client runs the
//! actual city simulation and pushes its numbers here; this module only
//! stores them. Updates are shallow: each top-level key in an update
//! replaces the stored value wholesale, so sending `services` replaces all
//! four service levels at once.

use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StateError;

/// Starting treasury for a new city.
pub const DEFAULT_BUDGET: i64 = 1_000_000;

/// Starting population for a new city.
pub const DEFAULT_POPULATION: u64 = 1_000;

/// Starting happiness (intended range 0-100).
pub const DEFAULT_HAPPINESS: i64 = 50;

/// Service coverage levels, keyed by service.
///
/// Members missing from an incoming object default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceLevels {
    /// Police coverage level.
    pub police: i64,
    /// Fire coverage level.
    pub fire: i64,
    /// Education coverage level.
    pub education: i64,
    /// Healthcare coverage level.
    pub healthcare: i64,
}

/// Game time in whichever form the client keeps it.
///
/// Some clients count elapsed seconds, the browser game keeps a clock face
/// such as `"08:00"`. Both are stored and written back as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameTime {
    /// Elapsed time, unit chosen by the client.
    Elapsed(f64),
    /// Time of day, e.g. `"08:00"`.
    OfDay(String),
}

impl Default for GameTime {
    fn default() -> Self {
        Self::Elapsed(0.0)
    }
}

impl From<f64> for GameTime {
    fn from(elapsed: f64) -> Self {
        Self::Elapsed(elapsed)
    }
}

impl From<&str> for GameTime {
    fn from(of_day: &str) -> Self {
        Self::OfDay(of_day.to_string())
    }
}

/// The attributes of the city currently being played.
///
/// Fields missing from incoming JSON take their [`Default`] values. Keys
/// the server does not know about (the client sends `paused`, for one) are
/// kept in [`GameState::extra`] and written back out unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    /// Treasury balance. May go negative.
    pub budget: i64,
    /// Number of residents.
    pub population: u64,
    /// Citizen happiness, nominally 0-100. Not clamped here.
    pub happiness: i64,
    /// In-game day counter.
    pub day: u64,
    /// Game time as reported by the client.
    pub time: GameTime,
    /// Game speed multiplier.
    #[serde(rename = "timeScale")]
    pub time_scale: f64,
    /// Placed buildings. Their shape belongs to the client.
    pub buildings: Vec<Value>,
    /// Service coverage levels.
    pub services: ServiceLevels,
    /// Any other top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            population: DEFAULT_POPULATION,
            happiness: DEFAULT_HAPPINESS,
            day: 1,
            time: GameTime::default(),
            time_scale: 1.0,
            buildings: Vec::new(),
            services: ServiceLevels::default(),
            extra: Map::new(),
        }
    }
}

impl GameState {
    /// Produce a new state with the keys of `partial` written over this one.
    ///
    /// Each key replaces the stored value as a whole. The result must still
    /// decode as a `GameState`, so `{"budget": "lots"}` is rejected while
    /// `{"mayor": "Quimby"}` lands in [`GameState::extra`].
    pub fn merged(&self, partial: Map<String, Value>) -> Result<Self, StateError> {
        let mut current = match serde_json::to_value(self).map_err(StateError::Encode)? {
            Value::Object(map) => map,
            other => return Err(StateError::NotAnObject(json_type_name(&other))),
        };
        for (key, value) in partial {
            current.insert(key, value);
        }
        serde_json::from_value(Value::Object(current)).map_err(StateError::InvalidValue)
    }
}

/// Human-readable name of a JSON value's type, for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Owner of the single live [`GameState`].
///
/// Shared between request handlers behind an `Arc`. Readers clone a
/// snapshot; writers swap the whole state under the write lock, so a
/// rejected update never leaves a half-applied state behind.
#[derive(Debug, Default)]
pub struct StateStore {
    state: RwLock<GameState>,
}

impl StateStore {
    /// Create a store holding `initial`.
    #[must_use]
    pub fn new(initial: GameState) -> Self {
        Self {
            state: RwLock::new(initial),
        }
    }

    /// Snapshot of the current state.
    pub fn get(&self) -> GameState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Merge the top-level keys of `partial` into the current state.
    ///
    /// Returns the state as it stands after the update.
    pub fn update(&self, partial: Value) -> Result<GameState, StateError> {
        let partial = match partial {
            Value::Object(map) => map,
            other => return Err(StateError::NotAnObject(json_type_name(&other))),
        };

        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        let next = state.merged(partial)?;
        *state = next.clone();
        tracing::debug!(budget = next.budget, day = next.day, "Game state updated");
        Ok(next)
    }

    /// Replace the current state wholesale.
    pub fn replace(&self, state: GameState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_state_matches_new_city() {
        let state = GameState::default();
        assert_eq!(state.budget, 1_000_000);
        assert_eq!(state.population, 1_000);
        assert_eq!(state.happiness, 50);
        assert_eq!(state.day, 1);
        assert!(state.buildings.is_empty());
        assert_eq!(state.services, ServiceLevels::default());
    }

    #[test]
    fn test_default_state_json_shape() {
        let value = serde_json::to_value(GameState::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "budget": 1_000_000,
                "population": 1_000,
                "happiness": 50,
                "day": 1,
                "time": 0.0,
                "timeScale": 1.0,
                "buildings": [],
                "services": {"police": 0, "fire": 0, "education": 0, "healthcare": 0}
            })
        );
    }

    #[test]
    fn test_get_is_idempotent() {
        let store = StateStore::default();
        let first = serde_json::to_string(&store.get()).unwrap();
        let second = serde_json::to_string(&store.get()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_update_budget_only_touches_budget() {
        let store = StateStore::default();
        store.update(json!({"budget": 500})).unwrap();

        let expected = GameState {
            budget: 500,
            ..GameState::default()
        };
        assert_eq!(store.get(), expected);
    }

    #[test]
    fn test_update_replaces_services_wholesale() {
        let store = StateStore::default();
        store
            .update(json!({"services": {"police": 3, "fire": 2, "education": 1, "healthcare": 4}}))
            .unwrap();
        store.update(json!({"services": {"police": 7}})).unwrap();

        let services = store.get().services;
        assert_eq!(services.police, 7);
        assert_eq!(services.fire, 0);
        assert_eq!(services.education, 0);
        assert_eq!(services.healthcare, 0);
    }

    #[test]
    fn test_update_keeps_unknown_keys() {
        let store = StateStore::default();
        store.update(json!({"paused": true})).unwrap();

        let state = store.get();
        assert_eq!(state.extra.get("paused"), Some(&json!(true)));
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(value["paused"], json!(true));
    }

    #[test]
    fn test_update_with_wrong_type_is_rejected_and_state_unchanged() {
        let store = StateStore::default();
        let err = store.update(json!({"budget": "lots"})).unwrap_err();
        assert!(matches!(err, StateError::InvalidValue(_)));
        assert_eq!(store.get(), GameState::default());
    }

    #[test]
    fn test_time_accepts_number_or_clock_face() {
        let store = StateStore::default();
        store.update(json!({"time": "08:00"})).unwrap();
        assert_eq!(store.get().time, GameTime::from("08:00"));
        assert_eq!(serde_json::to_value(store.get()).unwrap()["time"], json!("08:00"));

        store.update(json!({"time": 90})).unwrap();
        assert_eq!(store.get().time, GameTime::Elapsed(90.0));
    }

    #[test]
    fn test_concurrent_updates_are_all_applied() {
        let store = StateStore::default();
        std::thread::scope(|scope| {
            for writer in 0..8i64 {
                let store = &store;
                scope.spawn(move || {
                    for step in 0..50i64 {
                        let mut partial = Map::new();
                        partial.insert(format!("writer_{writer}"), json!(step));
                        partial.insert("budget".to_string(), json!(writer * 1_000 + step));
                        store.update(Value::Object(partial)).unwrap();
                    }
                });
            }
        });

        let state = store.get();
        for writer in 0..8 {
            assert_eq!(state.extra.get(&format!("writer_{writer}")), Some(&json!(49)));
        }
        assert_eq!(state.budget % 1_000, 49);
        assert_eq!(state.day, 1);
    }

    #[test]
    fn test_update_with_non_object_is_rejected() {
        let store = StateStore::default();
        let err = store.update(json!([1, 2, 3])).unwrap_err();
        assert!(matches!(err, StateError::NotAnObject("an array")));
    }

    #[test]
    fn test_negative_budget_is_allowed() {
        let store = StateStore::default();
        store.update(json!({"budget": -250})).unwrap();
        assert_eq!(store.get().budget, -250);
    }

    #[test]
    fn test_buildings_are_stored_opaquely() {
        let store = StateStore::default();
        let buildings = json!([
            {"type": "residential", "position": {"x": 1, "z": 2}, "population": 40},
            {"type": "park"}
        ]);
        store.update(json!({"buildings": buildings.clone()})).unwrap();
        assert_eq!(serde_json::to_value(store.get().buildings).unwrap(), buildings);
    }

    #[test]
    fn test_replace_swaps_whole_state() {
        let store = StateStore::default();
        store.update(json!({"paused": true})).unwrap();

        let loaded = GameState {
            day: 42,
            ..GameState::default()
        };
        store.replace(loaded.clone());
        assert_eq!(store.get(), loaded);
    }
}
