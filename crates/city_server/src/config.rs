//! Server configuration.
//!
//! Settings are layered: built-in defaults, then an optional RON file, then
//! command-line flags and environment variables.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Placeholder shown to the client when no map token is configured.
pub const PLACEHOLDER_MAPBOX_TOKEN: &str = "YOUR_MAPBOX_TOKEN";

/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,
    /// Directory holding save files. Created on startup if missing.
    pub saves_dir: PathBuf,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Map provider access token embedded in the index page.
    pub mapbox_token: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            saves_dir: PathBuf::from("saves"),
            static_dir: PathBuf::from("static"),
            mapbox_token: PLACEHOLDER_MAPBOX_TOKEN.to_string(),
        }
    }
}

impl ServerConfig {
    /// Parse a configuration from RON text. Missing fields keep their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Load a configuration from a RON file.
    pub fn from_ron_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply command-line and environment overrides on top of this config.
    #[must_use]
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(bind_addr) = overrides.bind_addr {
            self.bind_addr = bind_addr;
        }
        if let Some(saves_dir) = overrides.saves_dir {
            self.saves_dir = saves_dir;
        }
        if let Some(static_dir) = overrides.static_dir {
            self.static_dir = static_dir;
        }
        if let Some(token) = overrides.mapbox_token.filter(|token| !token.trim().is_empty()) {
            self.mapbox_token = token;
        }
        self
    }
}

/// Values that, when present, replace the corresponding config fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Listening address.
    pub bind_addr: Option<SocketAddr>,
    /// Save directory.
    pub saves_dir: Option<PathBuf>,
    /// Static file directory.
    pub static_dir: Option<PathBuf>,
    /// Map provider token. Blank values are ignored.
    pub mapbox_token: Option<String>,
}

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config '{}': {source}", path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON for a [`ServerConfig`].
    #[error("Failed to parse config '{}': {source}", path.display())]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: ron::error::SpannedError,
    },
}
