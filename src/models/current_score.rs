//! Device current score model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Latest computed score for a device. Exactly one row per device.
///
/// `current_streak_days` and `phishing_week_count` are maintained by the
/// engagement pipeline, not by score calculation: they are zeroed when the
/// row is first created and left untouched on every later upsert.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CurrentScoreState {
    pub device_id: Uuid,
    pub total_score: i32,
    pub security_score: i32,
    pub security_deductions: i32,
    pub engagement_points: i32,
    pub insurance_points: i32,
    pub status: String,
    pub color_code: String,
    pub last_calculated_at: DateTime<Utc>,
    pub current_streak_days: i32,
    pub phishing_week_count: i32,
}

/// Score fields written on each committed calculation
#[derive(Debug, Clone)]
pub struct ScoreStateUpdate {
    pub device_id: Uuid,
    pub total_score: i32,
    pub security_score: i32,
    pub security_deductions: i32,
    pub engagement_points: i32,
    pub insurance_points: i32,
    pub status: String,
    pub color_code: String,
    pub last_calculated_at: DateTime<Utc>,
}

impl CurrentScoreState {
    pub async fn find_by_device(pool: &PgPool, device_id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, CurrentScoreState>(
            "SELECT * FROM device_current_scores WHERE device_id = $1"
        )
        .bind(device_id)
        .fetch_optional(pool)
        .await
    }

    /// Atomic insert-or-update of the score fields. Streak and phishing
    /// counters are only set on insert (zeroed), never overwritten.
    pub async fn upsert<'e, E>(executor: E, update: &ScoreStateUpdate) -> Result<Self, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_as::<_, CurrentScoreState>(
            r#"
            INSERT INTO device_current_scores (
                device_id, total_score, security_score, security_deductions,
                engagement_points, insurance_points, status, color_code,
                last_calculated_at, current_streak_days, phishing_week_count
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 0, 0)
            ON CONFLICT (device_id) DO UPDATE SET
                total_score = EXCLUDED.total_score,
                security_score = EXCLUDED.security_score,
                security_deductions = EXCLUDED.security_deductions,
                engagement_points = EXCLUDED.engagement_points,
                insurance_points = EXCLUDED.insurance_points,
                status = EXCLUDED.status,
                color_code = EXCLUDED.color_code,
                last_calculated_at = EXCLUDED.last_calculated_at
            RETURNING *
            "#
        )
        .bind(update.device_id)
        .bind(update.total_score)
        .bind(update.security_score)
        .bind(update.security_deductions)
        .bind(update.engagement_points)
        .bind(update.insurance_points)
        .bind(&update.status)
        .bind(&update.color_code)
        .bind(update.last_calculated_at)
        .fetch_one(executor)
        .await
    }
}
