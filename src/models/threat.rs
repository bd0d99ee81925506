//! Threat detail model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// Threat categories counted by the protection summary.
pub const THREAT_TYPE_APP: &str = "APP_ISSUE";
pub const THREAT_TYPE_NETWORK: &str = "NETWORK_ISSUE";
pub const THREAT_TYPE_DEVICE: &str = "DEVICE_ISSUE";
pub const THREAT_TYPE_OTHER: &str = "OTHER";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ThreatRecord {
    pub id: Uuid,
    pub device_id: Uuid,
    pub threat_type: String,
    pub severity: String,
    pub status: String,
    pub detected_at: DateTime<Utc>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub source: Option<String>,
    pub raw_payload: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ThreatRecord {
    /// All unresolved threats for a device
    pub async fn find_active_for_device(pool: &PgPool, device_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ThreatRecord>(
            "SELECT * FROM threat_details WHERE device_id = $1 AND status = 'active'"
        )
        .bind(device_id)
        .fetch_all(pool)
        .await
    }

    /// Unresolved threats restricted to an id set (preview filtering)
    pub async fn find_active_by_ids(
        pool: &PgPool,
        device_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, ThreatRecord>(
            r#"
            SELECT * FROM threat_details
            WHERE device_id = $1 AND status = 'active' AND id = ANY($2)
            "#
        )
        .bind(device_id)
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
