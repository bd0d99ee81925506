//! Score engine storage seam
//!
//! The engine reads and writes through this narrow repository interface,
//! never against the pool directly. `PgStore` is the production
//! implementation; tests swap in an in-memory one.

use axum::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CurrentScoreState, DailyMetrics, DailyScoreSnapshot, DeductionRule, EngagementEvent,
    MetricLifetimeTotals, MetricWindowTotals, ScoreStateUpdate, SnapshotUpdate, ThreatRecord,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// All unresolved threats for a device
    async fn active_threats(&self, device_id: Uuid) -> Result<Vec<ThreatRecord>, StoreError>;

    /// Unresolved threats restricted to an id set
    async fn active_threats_by_ids(
        &self,
        device_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<ThreatRecord>, StoreError>;

    /// The full deduction rule table
    async fn deduction_rules(&self) -> Result<Vec<DeductionRule>, StoreError>;

    /// Activity events at or after `since`
    async fn engagement_events_since(
        &self,
        device_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<EngagementEvent>, StoreError>;

    /// The device's current score row, if it has one
    async fn current_state(&self, device_id: Uuid) -> Result<Option<CurrentScoreState>, StoreError>;

    /// Daily snapshots within [from, to] inclusive, oldest first
    async fn snapshots_in_range(
        &self,
        device_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyScoreSnapshot>, StoreError>;

    /// Persist one committed calculation. The current-state upsert and the
    /// daily-snapshot upsert must land together or not at all.
    async fn commit_score(
        &self,
        state: &ScoreStateUpdate,
        snapshot: &SnapshotUpdate,
    ) -> Result<(), StoreError>;

    /// Scan/block totals within [from, to] inclusive
    async fn metrics_window_totals(
        &self,
        device_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<MetricWindowTotals, StoreError>;

    /// Totals of every metric counter across the device's history
    async fn metrics_lifetime_totals(
        &self,
        device_id: Uuid,
    ) -> Result<MetricLifetimeTotals, StoreError>;
}

/// PostgreSQL-backed store
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreStore for PgStore {
    async fn active_threats(&self, device_id: Uuid) -> Result<Vec<ThreatRecord>, StoreError> {
        Ok(ThreatRecord::find_active_for_device(&self.pool, device_id).await?)
    }

    async fn active_threats_by_ids(
        &self,
        device_id: Uuid,
        ids: &[Uuid],
    ) -> Result<Vec<ThreatRecord>, StoreError> {
        Ok(ThreatRecord::find_active_by_ids(&self.pool, device_id, ids).await?)
    }

    async fn deduction_rules(&self) -> Result<Vec<DeductionRule>, StoreError> {
        Ok(DeductionRule::load_all(&self.pool).await?)
    }

    async fn engagement_events_since(
        &self,
        device_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<Vec<EngagementEvent>, StoreError> {
        Ok(EngagementEvent::find_since(&self.pool, device_id, since).await?)
    }

    async fn current_state(&self, device_id: Uuid) -> Result<Option<CurrentScoreState>, StoreError> {
        Ok(CurrentScoreState::find_by_device(&self.pool, device_id).await?)
    }

    async fn snapshots_in_range(
        &self,
        device_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DailyScoreSnapshot>, StoreError> {
        Ok(DailyScoreSnapshot::find_in_range(&self.pool, device_id, from, to).await?)
    }

    async fn commit_score(
        &self,
        state: &ScoreStateUpdate,
        snapshot: &SnapshotUpdate,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        CurrentScoreState::upsert(&mut *tx, state).await?;
        DailyScoreSnapshot::upsert(&mut *tx, snapshot).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn metrics_window_totals(
        &self,
        device_id: Uuid,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<MetricWindowTotals, StoreError> {
        Ok(DailyMetrics::window_totals(&self.pool, device_id, from, to).await?)
    }

    async fn metrics_lifetime_totals(
        &self,
        device_id: Uuid,
    ) -> Result<MetricLifetimeTotals, StoreError> {
        Ok(DailyMetrics::lifetime_totals(&self.pool, device_id).await?)
    }
}
