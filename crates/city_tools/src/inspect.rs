//! Listing and printing saves.

use std::fmt::Write as _;
use std::path::Path;

use city_core::error::Result;
use city_core::{SaveEntry, SaveGateway, SaveRecord};

/// Which save `show` should print.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveSelector {
    /// The newest save of a city.
    LatestOf(String),
    /// One specific file.
    File(String),
}

/// Saves in `path`, oldest first, optionally only those of `city`.
pub fn list_saves(path: &Path, city: Option<&str>) -> Result<Vec<SaveEntry>> {
    let entries = SaveGateway::new(path).list_entries()?;
    Ok(entries
        .into_iter()
        .filter(|entry| city.map_or(true, |city| entry.name.city_name == city))
        .collect())
}

/// Load the save picked by `selector`.
pub fn load_save(path: &Path, selector: &SaveSelector) -> Result<SaveRecord> {
    let gateway = SaveGateway::new(path);
    let record = match selector {
        SaveSelector::LatestOf(city) => gateway.load_most_recent(city)?,
        SaveSelector::File(filename) => gateway.load_file(filename)?,
    };
    Ok(record)
}

/// Table of saves, one per line.
pub fn format_entries(entries: &[SaveEntry]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<24} {:<19} {:>8}  FILE", "CITY", "SAVED", "BYTES");
    for entry in entries {
        let _ = writeln!(
            out,
            "{:<24} {:<19} {:>8}  {}",
            entry.name.city_name,
            entry.name.saved_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            entry.size,
            entry.filename
        );
    }
    out
}

/// One-paragraph summary of a save's headline numbers.
pub fn summarize(record: &SaveRecord) -> String {
    let state = &record.game_state;
    format!(
        "{} (saved {})\n  day {}  budget {}  population {}  happiness {}\n  buildings {}  services police={} fire={} education={} healthcare={}",
        record.city_name,
        record.timestamp,
        state.day,
        state.budget,
        state.population,
        state.happiness,
        state.buildings.len(),
        state.services.police,
        state.services.fire,
        state.services.education,
        state.services.healthcare,
    )
}
