//! JSON request and response shapes.
//!
//! Every mutating endpoint answers with an [`Envelope`]:
//!
//! ```text
//! -> POST /api/game/save {"city_name":"Springfield"}
//! <- {"status":"success","filename":"Springfield_20261018_120000.json"}
//! -> POST /api/game/load {"city_name":"Shelbyville"}
//! <- {"status":"error","message":"Failed to load game","reason":"not_found"}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use city_core::GameState;

/// Message returned when a save or load request names no city.
pub const CITY_NAME_REQUIRED: &str = "City name required";

/// Message returned for every failed load, whatever the cause.
pub const LOAD_FAILED: &str = "Failed to load game";

/// Message returned when writing a save fails.
pub const SAVE_FAILED: &str = "Failed to save game";

/// Message returned when the save directory cannot be listed.
pub const LIST_FAILED: &str = "Failed to list saves";

/// Message returned when a state update does not fit the game state.
pub const INVALID_UPDATE: &str = "Invalid state update";

/// Message returned when a request body cannot be decoded.
pub const INVALID_BODY: &str = "Invalid request body";

// ============================================================================
// Requests
// ============================================================================

/// Body of `/api/game/save` and `/api/game/load`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CityRequest {
    /// City to save or load.
    #[serde(default)]
    pub city_name: Option<String>,
}

impl CityRequest {
    /// The city name, if one was given and is not blank.
    pub fn city_name(&self) -> Option<&str> {
        self.city_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

/// Body of `/save`: the client's full game snapshot plus its city name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavePayload {
    /// City to save under. Defaults to `unnamed_city`.
    #[serde(rename = "cityName", default)]
    pub city_name: Option<String>,
    /// The client's own save time. Ignored; the server stamps saves itself.
    #[serde(rename = "timestamp", default)]
    pub client_timestamp: Option<Value>,
    /// Everything else in the payload.
    #[serde(flatten)]
    pub state: GameState,
}

// ============================================================================
// Responses
// ============================================================================

/// Success/error wrapper returned by the save, load and update endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Envelope {
    /// The request was carried out.
    Success {
        /// Name of the file written, for saves.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        filename: Option<String>,
        /// The state now in effect, for loads.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        game_state: Option<GameState>,
    },

    /// The request failed.
    Error {
        /// Human-readable message. Never carries internal error text.
        message: String,
        /// Machine-readable failure cause, where one is known.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl Envelope {
    /// Plain success.
    pub const fn success() -> Self {
        Self::Success {
            filename: None,
            game_state: None,
        }
    }

    /// Success after writing `filename`.
    pub fn saved(filename: impl Into<String>) -> Self {
        Self::Success {
            filename: Some(filename.into()),
            game_state: None,
        }
    }

    /// Success after loading `game_state`.
    pub fn loaded(game_state: GameState) -> Self {
        Self::Success {
            filename: None,
            game_state: Some(game_state),
        }
    }

    /// Failure with a message and no cause tag.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            reason: None,
        }
    }

    /// Failure with a message and a cause tag.
    pub fn failure(message: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
            reason: Some(reason.into()),
        }
    }

    /// True for [`Envelope::Success`].
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}
