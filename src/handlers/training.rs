//! Training status handler

use axum::{extract::State, Json};

use crate::models::TrainingStatusResponse;
use crate::AppState;

/// Current trainer state, cycle and corpus size
pub async fn status(State(state): State<AppState>) -> Json<TrainingStatusResponse> {
    Json(TrainingStatusResponse::from_context(&state.trainer))
}
