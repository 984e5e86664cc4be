//! Save record format and save filename grammar.
//!
//! Every save is one JSON file holding a [`SaveRecord`]. Files are named
//! `<city>_<YYYYMMDD>_<HHMMSS>.json`. If that name is already taken (two
//! saves of one city inside the same second) a sequence number is
//! appended: `<city>_<YYYYMMDD>_<HHMMSS>_<n>.json`, starting at 2.
//!
//! City names may themselves contain underscores, so filenames are parsed
//! from the right.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::state::GameState;

/// Extension of save files, without the dot.
pub const SAVE_EXTENSION: &str = "json";

/// `strftime` format of the timestamp embedded in filenames.
pub const FILENAME_TIME_FORMAT: &str = "%Y%m%d_%H%M%S";

/// `strftime` format of the ISO-8601 timestamp stored inside a record.
pub const RECORD_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// City name used when a client saves without naming the city.
pub const UNNAMED_CITY: &str = "unnamed_city";

/// One saved game as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    /// Name the player gave the city.
    pub city_name: String,
    /// Full game state at the moment of saving.
    pub game_state: GameState,
    /// When the save was written (informational only).
    pub timestamp: String,
}

impl SaveRecord {
    /// Create a record for `game_state`, stamped with `saved_at`.
    #[must_use]
    pub fn new(city_name: impl Into<String>, game_state: GameState, saved_at: NaiveDateTime) -> Self {
        Self {
            city_name: city_name.into(),
            game_state,
            timestamp: saved_at.format(RECORD_TIME_FORMAT).to_string(),
        }
    }
}

/// Parsed form of a save filename.
///
/// Orders by save time, then sequence, so the greatest name for a city is
/// its most recent save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SaveFileName {
    /// Second the save was written, from the filename.
    pub saved_at: NaiveDateTime,
    /// Disambiguates saves of one city within the same second. 1 = no suffix.
    pub sequence: u32,
    /// City part of the filename.
    pub city_name: String,
}

impl SaveFileName {
    /// Name for a first save of `city_name` at `saved_at`.
    #[must_use]
    pub fn new(city_name: impl Into<String>, saved_at: NaiveDateTime) -> Self {
        Self {
            saved_at,
            sequence: 1,
            city_name: city_name.into(),
        }
    }

    /// Render as a filename.
    #[must_use]
    pub fn to_filename(&self) -> String {
        let stamp = self.saved_at.format(FILENAME_TIME_FORMAT);
        if self.sequence <= 1 {
            format!("{}_{stamp}.{SAVE_EXTENSION}", self.city_name)
        } else {
            format!(
                "{}_{stamp}_{}.{SAVE_EXTENSION}",
                self.city_name, self.sequence
            )
        }
    }

    /// Parse a filename produced by [`SaveFileName::to_filename`].
    ///
    /// Returns `None` for anything else.
    pub fn parse(filename: &str) -> Option<Self> {
        let stem = filename.strip_suffix(&format!(".{SAVE_EXTENSION}"))?;

        let mut parts = stem.rsplitn(3, '_');
        if let (Some(time), Some(date), Some(city)) = (parts.next(), parts.next(), parts.next()) {
            if let Some(saved_at) = parse_stamp(date, time) {
                if !city.is_empty() {
                    return Some(Self {
                        saved_at,
                        sequence: 1,
                        city_name: city.to_string(),
                    });
                }
            }
        }

        let mut parts = stem.rsplitn(4, '_');
        let sequence = parts.next()?;
        let time = parts.next()?;
        let date = parts.next()?;
        let city = parts.next()?;
        if city.is_empty() || !is_digits(sequence) {
            return None;
        }
        let sequence: u32 = sequence.parse().ok()?;
        if sequence < 2 {
            return None;
        }
        Some(Self {
            saved_at: parse_stamp(date, time)?,
            sequence,
            city_name: city.to_string(),
        })
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn parse_stamp(date: &str, time: &str) -> Option<NaiveDateTime> {
    if date.len() != 8 || time.len() != 6 || !is_digits(date) || !is_digits(time) {
        return None;
    }
    let num = |s: &str| s.parse::<u32>().ok();
    let year = date[..4].parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, num(&date[4..6])?, num(&date[6..])?)?.and_hms_opt(
        num(&time[..2])?,
        num(&time[2..4])?,
        num(&time[4..])?,
    )
}

/// Check that `name` can safely become part of a filename.
///
/// Rejects blank names and anything that could escape the save directory.
pub fn validate_city_name(name: &str) -> Result<&str, PersistenceError> {
    let bad = name.trim().is_empty()
        || name.contains(['/', '\\', '\0'])
        || name.contains("..");
    if bad {
        return Err(PersistenceError::InvalidCityName(name.to_string()));
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 18)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn test_filename_format() {
        let name = SaveFileName::new("Springfield", at(9, 5, 7));
        assert_eq!(name.to_filename(), "Springfield_20261018_090507.json");
    }

    #[test]
    fn test_filename_with_sequence() {
        let mut name = SaveFileName::new("Springfield", at(9, 5, 7));
        name.sequence = 3;
        assert_eq!(name.to_filename(), "Springfield_20261018_090507_3.json");
        assert_eq!(SaveFileName::parse(&name.to_filename()), Some(name));
    }

    #[test]
    fn test_parse_city_with_underscores() {
        let parsed = SaveFileName::parse("new_york_city_20261018_235959.json").unwrap();
        assert_eq!(parsed.city_name, "new_york_city");
        assert_eq!(parsed.saved_at, at(23, 59, 59));
        assert_eq!(parsed.sequence, 1);
    }

    #[test]
    fn test_parse_city_ending_in_digits() {
        let parsed = SaveFileName::parse("sector_7_20261018_120000.json").unwrap();
        assert_eq!(parsed.city_name, "sector_7");
        assert_eq!(parsed.sequence, 1);
    }

    #[test]
    fn test_parse_rejects_foreign_files() {
        assert!(SaveFileName::parse("notes.txt").is_none());
        assert!(SaveFileName::parse("Springfield.json").is_none());
        assert!(SaveFileName::parse("_20261018_120000.json").is_none());
        assert!(SaveFileName::parse("Springfield_20261318_120000.json").is_none());
        assert!(SaveFileName::parse("Springfield_20261018_120000_1.json").is_none());
    }

    #[test]
    fn test_ordering_prefers_later_time_then_sequence() {
        let early = SaveFileName::new("A", at(10, 0, 0));
        let late = SaveFileName::new("A", at(10, 0, 1));
        let mut early_again = early.clone();
        early_again.sequence = 2;

        assert!(late > early_again);
        assert!(early_again > early);
    }

    #[test]
    fn test_record_timestamp_is_iso8601() {
        let record = SaveRecord::new("Springfield", GameState::default(), at(9, 5, 7));
        assert_eq!(record.timestamp, "2026-10-18T09:05:07.000000");
    }

    #[test]
    fn test_validate_city_name() {
        assert!(validate_city_name("Springfield").is_ok());
        assert!(validate_city_name("New Springfield").is_ok());
        assert!(validate_city_name("").is_err());
        assert!(validate_city_name("   ").is_err());
        assert!(validate_city_name("../etc").is_err());
        assert!(validate_city_name("a/b").is_err());
        assert!(validate_city_name("a\\b").is_err());
    }
}
