//! # City Builder Server
//!
//! HTTP backend for the browser city builder.
//!
//! The client runs the simulation; this server holds the current
//! [`GameState`](city_core::GameState), syncs it over JSON endpoints and
//! writes saves to disk through a [`SaveGateway`].
//!
//! ## Endpoints
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET | `/` | game page with the map token |
//! | GET | `/api/game/state` | current state |
//! | POST | `/api/game/update` | merge top-level keys into the state |
//! | POST | `/api/game/save` | save current state as `city_name` |
//! | POST | `/api/game/load` | load newest save of `city_name` |
//! | POST | `/save` | save a client-supplied snapshot |
//! | GET | `/saves` | list every save record |
//! | GET | `/static/*` | client assets |

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod error;
pub mod page;
pub mod protocol;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use city_core::{SaveGateway, StateStore};

pub use config::{ConfigOverrides, ServerConfig};

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The live game state.
    pub store: Arc<StateStore>,
    /// Save directory access.
    pub saves: Arc<SaveGateway>,
    /// Pre-rendered index page.
    pub index_html: Arc<str>,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
}

impl AppState {
    /// Fresh state for `config`: default game, saves in `config.saves_dir`.
    pub fn new(config: &ServerConfig) -> Self {
        Self::with_gateway(config, SaveGateway::new(&config.saves_dir))
    }

    /// Fresh state for `config` with a caller-supplied save gateway.
    pub fn with_gateway(config: &ServerConfig, saves: SaveGateway) -> Self {
        Self {
            store: Arc::new(StateStore::default()),
            saves: Arc::new(saves),
            index_html: page::render_index(page::INDEX_TEMPLATE, &config.mapbox_token).into(),
            static_dir: config.static_dir.clone(),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    let static_files = ServeDir::new(&state.static_dir);
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/api/game/state", get(routes::get_state))
        .route("/api/game/update", post(routes::update_state))
        .route("/api/game/save", post(routes::save_current))
        .route("/api/game/load", post(routes::load_city))
        .route("/save", post(routes::save_payload))
        .route("/saves", get(routes::list_saves))
        .nest_service("/static", static_files)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
