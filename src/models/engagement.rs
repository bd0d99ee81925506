//! Engagement event model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// A user activity event (DAILY_ACTIVE, DEVICE_SCAN, ALERT_RESPONDED,
/// FEATURE_USED, ISSUE_RESOLVED). Append-only.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EngagementEvent {
    pub id: Uuid,
    pub device_id: Uuid,
    pub event_type: String,
    pub occurred_at: DateTime<Utc>,
    pub points: i32,
    pub meta: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

impl EngagementEvent {
    /// Events for a device occurring at or after `since`
    pub async fn find_since(
        pool: &PgPool,
        device_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, EngagementEvent>(
            "SELECT * FROM engagement_events WHERE device_id = $1 AND occurred_at >= $2"
        )
        .bind(device_id)
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
