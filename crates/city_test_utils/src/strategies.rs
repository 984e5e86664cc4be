//! Proptest strategies for game state testing.

use proptest::prelude::*;
use serde_json::{json, Value};

use city_core::{GameState, GameTime, ServiceLevels};

/// Generate service levels in the range the client produces (0-10).
pub fn arb_services() -> impl Strategy<Value = ServiceLevels> {
    (0i64..=10, 0i64..=10, 0i64..=10, 0i64..=10).prop_map(
        |(police, fire, education, healthcare)| ServiceLevels {
            police,
            fire,
            education,
            healthcare,
        },
    )
}

/// Generate an opaque building record.
pub fn arb_building() -> impl Strategy<Value = Value> {
    (
        prop_oneof![
            Just("residential"),
            Just("commercial"),
            Just("industrial"),
            Just("park"),
        ],
        -500i32..500,
        -500i32..500,
        0u32..500,
    )
        .prop_map(|(kind, x, z, population)| {
            json!({"type": kind, "position": {"x": x, "z": z}, "population": population})
        })
}

/// Generate game time as either elapsed units or a clock face.
pub fn arb_game_time() -> impl Strategy<Value = GameTime> {
    prop_oneof![
        (0u32..1_000_000).prop_map(|elapsed| GameTime::Elapsed(f64::from(elapsed))),
        (0u32..24, 0u32..60).prop_map(|(hours, minutes)| GameTime::OfDay(format!("{hours:02}:{minutes:02}"))),
    ]
}

/// Generate a full game state.
pub fn arb_game_state() -> impl Strategy<Value = GameState> {
    (
        any::<i64>(),
        0u64..10_000_000,
        -20i64..120,
        1u64..10_000,
        arb_game_time(),
        prop_oneof![Just(0.5), Just(1.0), Just(2.0), Just(4.0)],
        proptest::collection::vec(arb_building(), 0..8),
        arb_services(),
    )
        .prop_map(
            |(budget, population, happiness, day, time, time_scale, buildings, services)| {
                GameState {
                    budget,
                    population,
                    happiness,
                    day,
                    time,
                    time_scale,
                    buildings,
                    services,
                    ..GameState::default()
                }
            },
        )
}

/// Generate a city name that is valid as part of a filename.
pub fn arb_city_name() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9 _-]{0,23}".prop_filter("trailing space", |name| !name.ends_with(' '))
}
