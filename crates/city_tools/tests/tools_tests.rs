//! Save tool tests against scratch save directories.

use city_core::GameState;
use city_test_utils::fixtures::{sample_state, TempSaves};
use city_tools::inspect::{self, SaveSelector};
use city_tools::validate;

#[test]
fn list_filters_by_city() {
    let saves = TempSaves::new();
    saves.gateway.save("Springfield", &sample_state()).unwrap();
    saves.gateway.save("Shelbyville", &GameState::default()).unwrap();
    saves.clock.advance_secs(30);
    saves.gateway.save("Springfield", &GameState::default()).unwrap();

    let all = inspect::list_saves(saves.dir(), None).unwrap();
    assert_eq!(all.len(), 3);

    let springfield = inspect::list_saves(saves.dir(), Some("Springfield")).unwrap();
    assert_eq!(springfield.len(), 2);
    assert!(springfield[0].name.saved_at < springfield[1].name.saved_at);
}

#[test]
fn entry_table_has_header_and_rows() {
    let saves = TempSaves::new();
    saves.gateway.save("Springfield", &sample_state()).unwrap();

    let table = inspect::format_entries(&inspect::list_saves(saves.dir(), None).unwrap());
    let lines: Vec<_> = table.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("CITY"));
    assert!(lines[1].contains("2026-10-18 12:00:00"));
    assert!(lines[1].ends_with("Springfield_20261018_120000.json"));
}

#[test]
fn show_latest_and_specific_file() {
    let saves = TempSaves::new();
    let first = saves.gateway.save("Springfield", &GameState::default()).unwrap();
    saves.clock.advance_secs(1);
    saves.gateway.save("Springfield", &sample_state()).unwrap();

    let latest = inspect::load_save(saves.dir(), &SaveSelector::LatestOf("Springfield".into())).unwrap();
    assert_eq!(latest.game_state, sample_state());

    let older = inspect::load_save(saves.dir(), &SaveSelector::File(first.filename)).unwrap();
    assert_eq!(older.game_state, GameState::default());

    let summary = inspect::summarize(&latest);
    assert!(summary.starts_with("Springfield (saved 2026-10-18T12:00:01.000000)"));
    assert!(summary.contains("day 14"));
    assert!(summary.contains("buildings 3"));
}

#[test]
fn validate_reports_clean_directory() {
    let saves = TempSaves::new();
    saves.gateway.save("Springfield", &sample_state()).unwrap();

    let report = validate::validate_save_directory(saves.dir()).unwrap();
    assert!(report.is_clean());
    assert!(validate::format_report(&report).ends_with("1 file(s) checked, 0 problem(s)"));
}

#[test]
fn validate_flags_renamed_and_damaged_files() {
    let saves = TempSaves::new();
    saves.gateway.save("Springfield", &sample_state()).unwrap();
    std::fs::rename(
        saves.dir().join("Springfield_20261018_120000.json"),
        saves.dir().join("Shelbyville_20261018_120000.json"),
    )
    .unwrap();
    saves.write_raw("Ogdenville_20261018_120000.json", b"{");

    let report = validate::validate_save_directory(saves.dir()).unwrap();
    assert_eq!(report.problems().count(), 2);

    let text = validate::format_report(&report);
    assert!(text.contains("does not match filename city 'Shelbyville'"));
    assert!(text.contains("FAIL  Ogdenville_20261018_120000.json"));
}

#[test]
fn validate_missing_directory_is_clean() {
    let saves = TempSaves::new();
    let report = validate::validate_save_directory(saves.dir()).unwrap();
    assert!(report.checks.is_empty());
}
