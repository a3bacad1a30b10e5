//! Anomaly Scoring Service
//!
//! Loads a pre-trained classifier once at startup and scores fixed-shape
//! feature sequences over HTTP.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 ANOMALY SCORING SERVICE                  │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌──────────────┐        ┌────────────────────────────┐  │
//! │  │  API (Axum)  │        │  Artifact Loader (startup) │  │
//! │  │  /health     │        │  candidate dirs → bundle   │  │
//! │  │  /predict    │        └─────────────┬──────────────┘  │
//! │  └──────┬───────┘                      │ write once      │
//! │         │ read-only                    ▼                 │
//! │         └──────────────────▶ ┌──────────────────┐        │
//! │                              │   ModelBundle    │        │
//! │                              │ scaler+classifier│        │
//! │                              └──────────────────┘        │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod models;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

pub use error::{AppError, AppResult};
use inference::SharedModel;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub model: SharedModel,
}

impl AppState {
    pub fn new(model: SharedModel) -> Self {
        Self { model }
    }
}

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
