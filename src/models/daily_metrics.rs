//! Daily protection metrics model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};

/// Per-day counters written by the ingestion pipeline. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DailyMetrics {
    pub id: Uuid,
    pub device_id: Uuid,
    pub date: NaiveDate,
    pub links_scanned: i32,
    pub spam_blocked: i32,
    pub app_issues_detected: i32,
    pub network_issues_detected: i32,
    pub device_issues_detected: i32,
    pub other_issues_detected: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scan/block totals over a date window
#[derive(Debug, Clone, Default, FromRow)]
pub struct MetricWindowTotals {
    pub links_scanned: i64,
    pub spam_blocked: i64,
}

/// Totals of every counter across all recorded days
#[derive(Debug, Clone, Default, FromRow)]
pub struct MetricLifetimeTotals {
    pub links_scanned: i64,
    pub spam_blocked: i64,
    pub app_issues_detected: i64,
    pub network_issues_detected: i64,
    pub device_issues_detected: i64,
    pub other_issues_detected: i64,
}

impl DailyMetrics {
    /// Sum of scan/block counters within [from, to] inclusive.
    /// Devices with no rows in the window sum to zero.
    pub async fn window_totals(
        pool: &PgPool,
        device_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<MetricWindowTotals, sqlx::Error> {
        sqlx::query_as::<_, MetricWindowTotals>(
            r#"
            SELECT
                COALESCE(SUM(links_scanned), 0) AS links_scanned,
                COALESCE(SUM(spam_blocked), 0) AS spam_blocked
            FROM protection_metrics_daily
            WHERE device_id = $1 AND date BETWEEN $2 AND $3
            "#
        )
        .bind(device_id)
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }

    /// Sum of every counter across the device's entire history
    pub async fn lifetime_totals(
        pool: &PgPool,
        device_id: Uuid,
    ) -> Result<MetricLifetimeTotals, sqlx::Error> {
        sqlx::query_as::<_, MetricLifetimeTotals>(
            r#"
            SELECT
                COALESCE(SUM(links_scanned), 0) AS links_scanned,
                COALESCE(SUM(spam_blocked), 0) AS spam_blocked,
                COALESCE(SUM(app_issues_detected), 0) AS app_issues_detected,
                COALESCE(SUM(network_issues_detected), 0) AS network_issues_detected,
                COALESCE(SUM(device_issues_detected), 0) AS device_issues_detected,
                COALESCE(SUM(other_issues_detected), 0) AS other_issues_detected
            FROM protection_metrics_daily
            WHERE device_id = $1
            "#
        )
        .bind(device_id)
        .fetch_one(pool)
        .await
    }
}
