//! Reading and writing save files.
//!
//! [`SaveGateway`] owns a flat directory of JSON save files. Writes go to a
//! temporary file first and are moved into place with a no-clobber rename,
//! so readers never observe a half-written save and an existing save is
//! never overwritten.

use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::clock::{Clock, SystemClock};
use crate::error::PersistenceError;
use crate::save::{validate_city_name, SaveFileName, SaveRecord, SAVE_EXTENSION};
use crate::state::GameState;

/// Upper bound on saves of one city within a single second.
pub const MAX_SAVES_PER_SECOND: u32 = 1_000;

/// Result of a successful save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveReceipt {
    /// Bare filename inside the save directory.
    pub filename: String,
    /// Full path of the written file.
    pub path: PathBuf,
    /// Wall-clock time the save was stamped with.
    pub saved_at: NaiveDateTime,
}

/// A save file found in the save directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    /// Parsed filename.
    pub name: SaveFileName,
    /// Bare filename.
    pub filename: String,
    /// Full path.
    pub path: PathBuf,
    /// File size in bytes.
    pub size: u64,
}

/// Outcome of checking one `.json` file in the save directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCheck {
    /// Bare filename.
    pub filename: String,
    /// Whether the filename follows the save naming scheme.
    pub well_named: bool,
    /// What is wrong with the file, if anything.
    pub problem: Option<String>,
}

/// Result of [`SaveGateway::validate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// One entry per `.json` file, in directory order.
    pub checks: Vec<FileCheck>,
}

impl ValidationReport {
    /// Files that have a problem.
    pub fn problems(&self) -> impl Iterator<Item = &FileCheck> {
        self.checks.iter().filter(|check| check.problem.is_some())
    }

    /// True when every file is a well-named, readable save record.
    pub fn is_clean(&self) -> bool {
        self.problems().next().is_none()
    }
}

/// Saves and loads [`SaveRecord`]s in a single directory.
#[derive(Debug, Clone)]
pub struct SaveGateway {
    dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl SaveGateway {
    /// Gateway over `dir`, stamping saves with the local clock.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(dir, Arc::new(SystemClock))
    }

    /// Gateway over `dir` using `clock` for timestamps.
    pub fn with_clock(dir: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            dir: dir.into(),
            clock,
        }
    }

    /// The save directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the save directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir).map_err(|e| PersistenceError::io(&self.dir, e))
    }

    /// Write `state` as a new save for `city_name`.
    ///
    /// The file is named after the city and the current second. A second
    /// save of the same city in the same second gets a sequence suffix
    /// instead of replacing the first.
    pub fn save(&self, city_name: &str, state: &GameState) -> Result<SaveReceipt, PersistenceError> {
        validate_city_name(city_name)?;
        self.ensure_dir()?;

        let saved_at = self.clock.now();
        let record = SaveRecord::new(city_name, state.clone(), saved_at);
        let body = serde_json::to_vec_pretty(&record).map_err(PersistenceError::Encode)?;

        let mut temp = tempfile::Builder::new()
            .prefix(".saving-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| PersistenceError::io(&self.dir, e))?;
        temp.write_all(&body)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| PersistenceError::io(temp.path(), e))?;

        let mut name = SaveFileName::new(city_name, saved_at);
        loop {
            let path = self.dir.join(name.to_filename());
            match temp.persist_noclobber(&path) {
                Ok(_) => {
                    let filename = name.to_filename();
                    tracing::info!(city = city_name, %filename, "Game saved");
                    return Ok(SaveReceipt {
                        filename,
                        path,
                        saved_at,
                    });
                }
                Err(err)
                    if err.error.kind() == io::ErrorKind::AlreadyExists
                        && name.sequence < MAX_SAVES_PER_SECOND =>
                {
                    temp = err.file;
                    name.sequence += 1;
                }
                Err(err) => return Err(PersistenceError::io(path, err.error)),
            }
        }
    }

    /// Load the newest save of `city_name`.
    ///
    /// Only exact city-name matches count: `"Spring"` never picks up a
    /// `"Springfield"` save.
    pub fn load_most_recent(&self, city_name: &str) -> Result<SaveRecord, PersistenceError> {
        validate_city_name(city_name)?;

        let latest = self
            .list_entries()?
            .into_iter()
            .filter(|entry| entry.name.city_name == city_name)
            .max_by(|a, b| a.name.cmp(&b.name))
            .ok_or_else(|| PersistenceError::NotFound {
                name: city_name.to_string(),
            })?;

        let record = read_record(&latest.path)?;
        tracing::info!(city = city_name, filename = %latest.filename, "Game loaded");
        Ok(record)
    }

    /// Load one save by its bare filename.
    pub fn load_file(&self, filename: &str) -> Result<SaveRecord, PersistenceError> {
        let is_plain = !filename.contains(['/', '\\', '\0'])
            && !filename.starts_with('.')
            && Path::new(filename).extension() == Some(OsStr::new(SAVE_EXTENSION));
        if !is_plain {
            return Err(PersistenceError::InvalidFilename(filename.to_string()));
        }

        let path = self.dir.join(filename);
        if !path.is_file() {
            return Err(PersistenceError::NotFound {
                name: filename.to_string(),
            });
        }
        read_record(&path)
    }

    /// Every save record in the directory, in directory-listing order.
    ///
    /// Files that cannot be read or parsed are skipped with a warning. A
    /// missing directory yields an empty list.
    pub fn list_all(&self) -> Result<Vec<SaveRecord>, PersistenceError> {
        let mut records = Vec::new();
        for path in self.json_files()? {
            match read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => tracing::warn!("Skipping unreadable save {:?}: {}", path, e),
            }
        }
        Ok(records)
    }

    /// Metadata for every correctly named save file, oldest first.
    pub fn list_entries(&self) -> Result<Vec<SaveEntry>, PersistenceError> {
        let mut entries: Vec<SaveEntry> = self
            .json_files()?
            .into_iter()
            .filter_map(save_entry)
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }

    /// Check every `.json` file in the directory.
    pub fn validate(&self) -> Result<ValidationReport, PersistenceError> {
        let mut report = ValidationReport::default();
        for path in self.json_files()? {
            let filename = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            let parsed_name = SaveFileName::parse(&filename);

            let problem = match (read_record(&path), &parsed_name) {
                (Err(e), _) => Some(e.to_string()),
                (Ok(_), None) => Some("filename does not match <city>_<YYYYMMDD>_<HHMMSS>.json".to_string()),
                (Ok(record), Some(name)) if record.city_name != name.city_name => Some(format!(
                    "record city '{}' does not match filename city '{}'",
                    record.city_name, name.city_name
                )),
                (Ok(_), Some(_)) => None,
            };

            report.checks.push(FileCheck {
                filename,
                well_named: parsed_name.is_some(),
                problem,
            });
        }
        Ok(report)
    }

    /// Paths of all `*.json` files, in directory-listing order.
    fn json_files(&self) -> Result<Vec<PathBuf>, PersistenceError> {
        let read_dir = match fs::read_dir(&self.dir) {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(PersistenceError::io(&self.dir, e)),
        };

        let mut paths = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|e| PersistenceError::io(&self.dir, e))?;
            let path = entry.path();
            if path.is_file() && path.extension() == Some(OsStr::new(SAVE_EXTENSION)) {
                paths.push(path);
            }
        }
        Ok(paths)
    }
}

/// Entry for a well-named save file. A file that vanished or cannot be
/// stat'ed since the directory was listed is skipped.
fn save_entry(path: PathBuf) -> Option<SaveEntry> {
    let filename = path.file_name().and_then(OsStr::to_str)?.to_string();
    let name = SaveFileName::parse(&filename)?;
    match fs::metadata(&path) {
        Ok(metadata) => Some(SaveEntry {
            name,
            filename,
            size: metadata.len(),
            path,
        }),
        Err(e) => {
            tracing::warn!("Skipping save {:?}: {}", path, e);
            None
        }
    }
}

fn read_record(path: &Path) -> Result<SaveRecord, PersistenceError> {
    let bytes = fs::read(path).map_err(|e| PersistenceError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|source| PersistenceError::Corrupt {
        path: path.to_path_buf(),
        source,
    })
}
