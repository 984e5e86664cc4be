//! Request handlers.
//!
//! Handlers are thin: they pull the request apart, call the state store or
//! the save gateway, and wrap the result in an [`Envelope`]. Bodies that do
//! not decode are answered with an error envelope too. Save directory work
//! runs on the blocking thread pool.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::Html;
use axum::Json;
use serde_json::Value;
use tokio::task::JoinError;

use city_core::{GameState, PersistenceError, SaveGateway, SaveRecord, UNNAMED_CITY};

use crate::error::ApiError;
use crate::protocol::{
    CityRequest, Envelope, SavePayload, CITY_NAME_REQUIRED, INVALID_UPDATE, LIST_FAILED,
    LOAD_FAILED, SAVE_FAILED,
};
use crate::AppState;

/// `GET /` - the game page.
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.index_html.to_string())
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({"ok": true, "service": "city_server"}))
}

/// `GET /api/game/state` - the current game state.
pub async fn get_state(State(state): State<AppState>) -> Json<GameState> {
    Json(state.store.get())
}

/// `POST /api/game/update` - merge top-level keys into the current state.
pub async fn update_state(
    State(state): State<AppState>,
    partial: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(partial) = partial?;
    state.store.update(partial).map_err(|e| {
        tracing::warn!("Rejected state update: {e}");
        ApiError::unprocessable(INVALID_UPDATE).with_reason("invalid_state")
    })?;
    Ok(Json(Envelope::success()))
}

/// `POST /api/game/save` - save the current state under `city_name`.
pub async fn save_current(
    State(state): State<AppState>,
    request: Result<Json<CityRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(request) = request?;
    let Some(city_name) = request.city_name() else {
        return Ok(Json(Envelope::error(CITY_NAME_REQUIRED)));
    };
    let snapshot = state.store.get();
    write_save(&state, city_name.to_string(), snapshot).await
}

/// `POST /save` - save a snapshot sent by the client.
///
/// Does not touch the current in-memory state.
pub async fn save_payload(
    State(state): State<AppState>,
    payload: Result<Json<SavePayload>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(payload) = payload?;
    let city_name = payload
        .city_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNNAMED_CITY.to_string());
    write_save(&state, city_name, payload.state).await
}

/// `POST /api/game/load` - make the newest save of `city_name` current.
pub async fn load_city(
    State(state): State<AppState>,
    request: Result<Json<CityRequest>, JsonRejection>,
) -> Result<Json<Envelope>, ApiError> {
    let Json(request) = request?;
    let Some(city_name) = request.city_name().map(str::to_string) else {
        return Ok(Json(Envelope::failure(LOAD_FAILED, "city_name_required")));
    };

    let lookup = city_name.clone();
    let loaded = with_saves(&state, move |saves| saves.load_most_recent(&lookup))
        .await
        .map_err(|e| {
            tracing::error!(city = %city_name, "Load task failed: {e}");
            ApiError::internal(LOAD_FAILED)
        })?;

    match loaded {
        Ok(record) => {
            state.store.replace(record.game_state.clone());
            Ok(Json(Envelope::loaded(record.game_state)))
        }
        Err(e) => {
            match &e {
                PersistenceError::NotFound { .. } | PersistenceError::InvalidCityName(_) => {
                    tracing::info!(city = %city_name, "Load failed: {e}");
                }
                _ => tracing::error!(city = %city_name, "Load failed: {e}"),
            }
            Ok(Json(Envelope::failure(LOAD_FAILED, e.kind())))
        }
    }
}

/// `GET /saves` - every readable save record.
pub async fn list_saves(State(state): State<AppState>) -> Result<Json<Vec<SaveRecord>>, ApiError> {
    let listed = with_saves(&state, SaveGateway::list_all)
        .await
        .map_err(|e| {
            tracing::error!("Listing task failed: {e}");
            ApiError::internal(LIST_FAILED)
        })?;
    listed.map(Json).map_err(|e| {
        tracing::error!("Listing saves failed: {e}");
        ApiError::internal(LIST_FAILED)
    })
}

async fn write_save(
    state: &AppState,
    city_name: String,
    snapshot: GameState,
) -> Result<Json<Envelope>, ApiError> {
    let name = city_name.clone();
    let written = with_saves(state, move |saves| saves.save(&name, &snapshot))
        .await
        .map_err(|e| {
            tracing::error!(city = %city_name, "Save task failed: {e}");
            ApiError::internal(SAVE_FAILED)
        })?;

    match written {
        Ok(receipt) => Ok(Json(Envelope::saved(receipt.filename))),
        Err(e @ PersistenceError::InvalidCityName(_)) => {
            Ok(Json(Envelope::failure(e.to_string(), e.kind())))
        }
        Err(e) => {
            tracing::error!(city = %city_name, "Save failed: {e}");
            Err(ApiError::internal(SAVE_FAILED))
        }
    }
}

/// Run `op` against the save gateway on the blocking thread pool.
async fn with_saves<R, F>(state: &AppState, op: F) -> Result<R, JoinError>
where
    F: FnOnce(&SaveGateway) -> R + Send + 'static,
    R: Send + 'static,
{
    let saves = Arc::clone(&state.saves);
    tokio::task::spawn_blocking(move || op(&saves)).await
}
