//! Error types for game state and save persistence.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using [`CityError`].
pub type Result<T> = std::result::Result<T, CityError>;

/// Top-level error type for the city core.
#[derive(Debug, Error)]
pub enum CityError {
    /// Update or replacement of the in-memory state failed.
    #[error(transparent)]
    State(#[from] StateError),

    /// Reading or writing a save file failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Errors raised by the state store.
#[derive(Debug, Error)]
pub enum StateError {
    /// The update body was not a JSON object.
    #[error("State update must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A key was present but its value has the wrong JSON type.
    #[error("State update rejected: {0}")]
    InvalidValue(#[source] serde_json::Error),

    /// The current state could not be turned back into JSON for merging.
    #[error("Failed to encode current state: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Errors raised by the save gateway.
///
/// Each variant is a distinct failure cause so callers can report
/// "no save exists" differently from "the save is damaged".
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// No save file exists for the requested city or filename.
    #[error("No save found for '{name}'")]
    NotFound {
        /// City name or filename that was looked up.
        name: String,
    },

    /// A save file exists but does not contain a valid save record.
    #[error("Save file '{}' is corrupt: {source}", path.display())]
    Corrupt {
        /// Path of the offending file.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Filesystem access failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A save record could not be encoded as JSON.
    #[error("Failed to encode save record: {0}")]
    Encode(#[source] serde_json::Error),

    /// The city name cannot be used as part of a filename.
    #[error("Invalid city name '{0}'")]
    InvalidCityName(String),

    /// The requested filename is not a plain save filename.
    #[error("Invalid save filename '{0}'")]
    InvalidFilename(String),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Short machine-readable tag for the failure cause.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Corrupt { .. } => "corrupt",
            Self::Io { .. } => "io",
            Self::Encode(_) => "encode",
            Self::InvalidCityName(_) => "invalid_city_name",
            Self::InvalidFilename(_) => "invalid_filename",
        }
    }
}
