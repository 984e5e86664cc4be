//! Save directory validation.

use std::fmt::Write as _;
use std::path::Path;

use city_core::error::Result;
use city_core::{SaveGateway, ValidationReport};

/// Check every save file in `path`.
///
/// # Errors
///
/// Returns an error if the directory cannot be read. Problems with
/// individual files are reported in the returned [`ValidationReport`].
pub fn validate_save_directory(path: &Path) -> Result<ValidationReport> {
    Ok(SaveGateway::new(path).validate()?)
}

/// Human-readable summary of a report, one line per file.
pub fn format_report(report: &ValidationReport) -> String {
    let mut out = String::new();
    for check in &report.checks {
        match &check.problem {
            None => {
                let _ = writeln!(out, "ok    {}", check.filename);
            }
            Some(problem) => {
                let _ = writeln!(out, "FAIL  {}: {problem}", check.filename);
            }
        }
    }
    let failed = report.problems().count();
    let _ = write!(
        out,
        "{} file(s) checked, {failed} problem(s)",
        report.checks.len()
    );
    out
}
