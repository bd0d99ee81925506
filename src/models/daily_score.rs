//! Daily score snapshot model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};

/// Persisted score for one device on one calendar day.
/// UNIQUE (device_id, date) is the guard against duplicate per-day rows.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyScoreSnapshot {
    pub id: Uuid,
    pub device_id: Uuid,
    pub date: NaiveDate,
    pub total_score: i32,
    pub components: Option<serde_json::Value>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Snapshot fields written on each committed calculation
#[derive(Debug, Clone)]
pub struct SnapshotUpdate {
    pub device_id: Uuid,
    pub date: NaiveDate,
    pub total_score: i32,
    pub components: serde_json::Value,
    pub status: String,
    pub written_at: DateTime<Utc>,
}

impl DailyScoreSnapshot {
    /// Snapshots for a device within [from, to] inclusive, oldest first
    pub async fn find_in_range(
        pool: &PgPool,
        device_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DailyScoreSnapshot>(
            r#"
            SELECT * FROM device_daily_scores
            WHERE device_id = $1 AND date BETWEEN $2 AND $3
            ORDER BY date ASC
            "#
        )
        .bind(device_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
    }

    /// Atomic insert-or-update of the day's snapshot
    pub async fn upsert<'e, E>(executor: E, update: &SnapshotUpdate) -> Result<Self, sqlx::Error>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query_as::<_, DailyScoreSnapshot>(
            r#"
            INSERT INTO device_daily_scores (device_id, date, total_score, components, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (device_id, date) DO UPDATE SET
                total_score = EXCLUDED.total_score,
                components = EXCLUDED.components,
                status = EXCLUDED.status,
                updated_at = EXCLUDED.updated_at
            RETURNING *
            "#
        )
        .bind(update.device_id)
        .bind(update.date)
        .bind(update.total_score)
        .bind(&update.components)
        .bind(&update.status)
        .bind(update.written_at)
        .fetch_one(executor)
        .await
    }
}
