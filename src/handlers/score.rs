//! Score handlers

use axum::{extract::{Path, State}, Json};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{AppState, AppError, AppResult};
use crate::score::engine::ScoreResult;

/// Preview request body
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScorePreviewRequest {
    #[validate(length(min = 1, message = "threatIds must not be empty"))]
    pub threat_ids: Vec<Uuid>,
    pub ignore_other_threats: Option<bool>,
}

/// Calculate, persist, and return the device's current score
pub async fn get_score(
    State(state): State<AppState>,
    Path(device_id): Path<Uuid>,
) -> AppResult<Json<ScoreResult>> {
    let result = state.engine.calculate_and_persist(device_id).await?;
    Ok(Json(result))
}

/// What-if score over a subset of the device's threats. No persistence.
pub async fn preview_score(
    State(state): State<AppState>,
    Path(device_id): Path<Uuid>,
    Json(req): Json<ScorePreviewRequest>,
) -> AppResult<Json<ScoreResult>> {
    req.validate()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let ignore_other_threats = req.ignore_other_threats.unwrap_or(true);
    let result = state
        .engine
        .preview(device_id, &req.threat_ids, ignore_other_threats)
        .await?;
    Ok(Json(result))
}
