//! Trend and summary handlers

use axum::{extract::{Path, Query, State}, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, AppResult};
use crate::score::engine::{ProtectionSummary, WeeklyProgress};

#[derive(Debug, Deserialize, Default)]
pub struct SummaryQuery {
    pub scope: Option<String>,
}

/// Weekly score trend with streak counters
pub async fn weekly_progress(
    State(state): State<AppState>,
    Path(device_id): Path<Uuid>,
) -> AppResult<Json<WeeklyProgress>> {
    let progress = state.engine.weekly_progress(device_id).await?;
    Ok(Json(progress))
}

/// 30-day and lifetime protection metrics
pub async fn protection_summary(
    State(state): State<AppState>,
    Path(device_id): Path<Uuid>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<ProtectionSummary>> {
    // scope is accepted but not yet differentiated; both blocks are
    // always returned.
    if let Some(scope) = query.scope.as_deref() {
        tracing::debug!("protection-summary scope={} requested", scope);
    }

    let summary = state.engine.protection_summary(device_id).await?;
    Ok(Json(summary))
}
