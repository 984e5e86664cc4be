//! Test fixtures and helpers.
//!
//! Pre-built game states and save directories for consistent testing.

use std::path::Path;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use city_core::{FixedClock, GameState, GameTime, SaveGateway, ServiceLevels};
use serde_json::json;
use tempfile::TempDir;

/// The instant every [`TempSaves`] clock starts at: 2026-10-18 12:00:00.
#[must_use]
pub fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 10, 18)
        .and_then(|date| date.and_hms_opt(12, 0, 0))
        .expect("valid fixture date")
}

/// A mid-game city with a few buildings and funded services.
#[must_use]
pub fn sample_state() -> GameState {
    let mut state = GameState {
        budget: 742_500,
        population: 3_250,
        happiness: 68,
        day: 14,
        time: GameTime::from("14:30"),
        time_scale: 2.0,
        buildings: vec![
            json!({"id": 1, "type": "residential", "position": {"x": 10.0, "z": -4.0}, "population": 120, "income": 0}),
            json!({"id": 2, "type": "commercial", "position": {"x": 14.0, "z": -4.0}, "population": 0, "income": 350}),
            json!({"id": 3, "type": "industrial", "position": {"x": 30.0, "z": 8.0}, "population": 0, "income": 600}),
        ],
        services: ServiceLevels {
            police: 2,
            fire: 1,
            education: 3,
            healthcare: 1,
        },
        ..GameState::default()
    };
    state.extra.insert("paused".to_string(), json!(false));
    state
}

/// A scratch save directory with a gateway whose clock only moves when told.
///
/// The directory is deleted when this value is dropped.
#[derive(Debug)]
pub struct TempSaves {
    /// Keeps the directory alive.
    pub root: TempDir,
    /// Gateway writing into `root/saves`.
    pub gateway: SaveGateway,
    /// Clock used by `gateway`.
    pub clock: Arc<FixedClock>,
}

impl TempSaves {
    /// Create an empty scratch save directory. The `saves` subdirectory does
    /// not exist until the first save.
    #[must_use]
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        let clock = Arc::new(FixedClock::new(start_time()));
        let gateway = SaveGateway::with_clock(root.path().join("saves"), clock.clone());
        Self {
            root,
            gateway,
            clock,
        }
    }

    /// The save directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.gateway.dir()
    }

    /// Number of files currently in the save directory.
    #[must_use]
    pub fn file_count(&self) -> usize {
        std::fs::read_dir(self.dir()).map_or(0, |entries| entries.count())
    }

    /// Write raw bytes into the save directory, creating it if needed.
    pub fn write_raw(&self, filename: &str, contents: &[u8]) {
        self.gateway.ensure_dir().expect("create save dir");
        std::fs::write(self.dir().join(filename), contents).expect("write raw save");
    }
}

impl Default for TempSaves {
    fn default() -> Self {
        Self::new()
    }
}
