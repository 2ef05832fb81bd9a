//! Ferry Risk Service
//!
//! Estimates the chance a ferry departure is cancelled from wind, waves and
//! visibility, using a random forest that keeps retraining on synthetic
//! ground-truth scenarios.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       FERRY RISK                             │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌──────────┐   ┌────────────────────────┐  │
//! │  │ Scenario   │──▶│ Corpus   │──▶│ Trainer (background)   │  │
//! │  │ Generator  │   │ (grows)  │   │ retrain + publish      │  │
//! │  └────────────┘   └──────────┘   └───────────┬────────────┘  │
//! │                                              ▼               │
//! │  ┌────────────┐                  ┌────────────────────────┐  │
//! │  │ API (Axum) │─────────────────▶│ Snapshot → Estimator   │  │
//! │  └────────────┘                  └────────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod handlers;
pub mod logic;
pub mod models;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

use logic::TrainerContext;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub trainer: Arc<TrainerContext>,
    pub config: config::Config,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/predict-risk", post(handlers::predict::predict_risk))
        .route("/api/v1/training/status", get(handlers::training::status))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
