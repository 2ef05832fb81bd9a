//! Risk prediction handler

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use validator::Validate;

use crate::logic::FeatureTriple;
use crate::models::{PredictRiskRequest, PredictRiskResponse};
use crate::{AppResult, AppState};

/// Estimate the cancellation probability for the given weather
pub async fn predict_risk(
    State(state): State<AppState>,
    payload: Result<Json<PredictRiskRequest>, JsonRejection>,
) -> AppResult<Json<PredictRiskResponse>> {
    let Json(req) = payload?;

    let input = req.with_defaults();
    input.validate()?;

    let assessment = state.trainer.estimate(&FeatureTriple::from(input))?;

    tracing::debug!(
        "predict-risk wind={} wave={} vis={} -> {:.2}% {}",
        input.wind_speed,
        input.wave_height,
        input.visibility,
        assessment.cancellation_probability,
        assessment.status
    );

    Ok(Json(PredictRiskResponse::from(assessment)))
}
