//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::constants::{APP_NAME, APP_VERSION};
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    environment: String,
    model_ready: bool,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: APP_NAME,
        version: APP_VERSION,
        environment: state.config.environment.clone(),
        model_ready: state.trainer.snapshot().is_ready(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
