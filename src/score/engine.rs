//! Score orchestration
//!
//! Commit mode computes and persists; preview mode computes over a
//! caller-chosen threat subset and touches nothing. Weekly trend and
//! protection summary are read-only aggregations over the same store.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    DailyScoreSnapshot, ScoreStateUpdate, SnapshotUpdate,
    THREAT_TYPE_APP, THREAT_TYPE_DEVICE, THREAT_TYPE_NETWORK, THREAT_TYPE_OTHER,
};

use super::clock::Clock;
use super::engagement::{self, ENGAGEMENT_WINDOW_DAYS};
use super::security::{self, SecurityBreakdown};
use super::status;
use super::store::{ScoreStore, StoreError};

/// Cap on the combined score
pub const MAX_TOTAL: i32 = 90;

/// Insurance component, reserved: always zero for now
const INSURANCE_POINTS: i32 = 0;

/// Days of history in each weekly-trend window
const TREND_WINDOW_DAYS: i64 = 7;

/// Rolling window of the protection summary's active block
const SUMMARY_WINDOW_DAYS: i64 = 30;

const STREAK_SUGGESTION: &str = "Keep opening CYBX daily to maintain your streak.";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub security_score: i32,
    pub security_deductions: i32,
    pub engagement_points: i32,
    pub insurance_points: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub device_id: Uuid,
    pub total_score: i32,
    pub status: String,
    pub color_code: String,
    pub message: String,
    pub breakdown: ScoreBreakdown,
    pub last_calculated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub total_score: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTrend {
    pub points: Vec<TrendPoint>,
    pub change_absolute: i32,
    pub change_percent: f64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionProgress {
    pub current_streak_days: i32,
    pub phishing_blocked_this_week: i32,
    pub suggestion: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub period: &'static str,
    pub trend: WeeklyTrend,
    pub protection_progress: ProtectionProgress,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSummary {
    pub links_scanned: i64,
    pub spam_blocked: i64,
    pub app_issues: i64,
    pub network_issues: i64,
    pub device_issues: i64,
    pub other_issues: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifetimeSummary {
    pub links_scanned: i64,
    pub spam_blocked: i64,
    pub app_issues: i64,
    pub network_issues: i64,
    pub device_issues: i64,
    pub other_issues: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionSummary {
    pub scope: &'static str,
    pub active_window_days: i64,
    pub active: ActiveSummary,
    pub lifetime: LifetimeSummary,
}

#[derive(Clone)]
pub struct ScoreEngine<S, C> {
    store: S,
    clock: C,
}

impl<S: ScoreStore, C: Clock> ScoreEngine<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    /// Compute the device's score, persist current state and today's
    /// snapshot, and return the result
    pub async fn calculate_and_persist(&self, device_id: Uuid) -> Result<ScoreResult, StoreError> {
        let now = self.clock.now();
        let security = self.security_component(device_id, None).await?;
        let engagement_points = self.engagement_component(device_id, now).await?;
        let result = compose(device_id, security, engagement_points, now);

        let state = ScoreStateUpdate {
            device_id,
            total_score: result.total_score,
            security_score: result.breakdown.security_score,
            security_deductions: result.breakdown.security_deductions,
            engagement_points: result.breakdown.engagement_points,
            insurance_points: result.breakdown.insurance_points,
            status: result.status.clone(),
            color_code: result.color_code.clone(),
            last_calculated_at: now,
        };
        let snapshot = SnapshotUpdate {
            device_id,
            date: now.date_naive(),
            total_score: result.total_score,
            components: serde_json::json!({
                "security": result.breakdown.security_score,
                "engagement": result.breakdown.engagement_points,
                "insurance": result.breakdown.insurance_points,
            }),
            status: result.status.clone(),
            written_at: now,
        };
        self.store.commit_score(&state, &snapshot).await?;

        tracing::debug!(
            "Score persisted for device {}: {} ({})",
            device_id,
            result.total_score,
            result.status
        );

        Ok(result)
    }

    /// What-if score over a caller-chosen subset of threats. Persists
    /// nothing.
    pub async fn preview(
        &self,
        device_id: Uuid,
        threat_ids: &[Uuid],
        ignore_other_threats: bool,
    ) -> Result<ScoreResult, StoreError> {
        let now = self.clock.now();
        let security = self
            .security_component(device_id, Some((threat_ids, ignore_other_threats)))
            .await?;
        let engagement_points = self.engagement_component(device_id, now).await?;
        Ok(compose(device_id, security, engagement_points, now))
    }

    /// Last 7 daily snapshots against the prior 7, plus streak counters
    pub async fn weekly_progress(&self, device_id: Uuid) -> Result<WeeklyProgress, StoreError> {
        let today = self.clock.now().date_naive();

        let this_start = today - Duration::days(TREND_WINDOW_DAYS - 1);
        let scores = self
            .store
            .snapshots_in_range(device_id, this_start, today)
            .await?;

        let prev_start = today - Duration::days(2 * TREND_WINDOW_DAYS - 1);
        let prev_end = today - Duration::days(TREND_WINDOW_DAYS);
        let prev_scores = self
            .store
            .snapshots_in_range(device_id, prev_start, prev_end)
            .await?;

        let points: Vec<TrendPoint> = scores
            .iter()
            .map(|s| TrendPoint {
                date: s.date,
                total_score: s.total_score,
            })
            .collect();

        let this_avg = average(&scores);
        let prev_avg = average(&prev_scores);
        let change_absolute = this_avg - prev_avg;
        let change_percent = if prev_avg != 0.0 {
            change_absolute / prev_avg * 100.0
        } else {
            0.0
        };

        // Streak and phishing counters live on the current-state row;
        // a device with no history defaults to zero.
        let current = self.store.current_state(device_id).await?;
        let (streak_days, phishing_blocked) = current
            .map(|c| (c.current_streak_days, c.phishing_week_count))
            .unwrap_or((0, 0));

        Ok(WeeklyProgress {
            period: "7d",
            trend: WeeklyTrend {
                points,
                change_absolute: change_absolute.round() as i32,
                change_percent: (change_percent * 10.0).round() / 10.0,
            },
            protection_progress: ProtectionProgress {
                current_streak_days: streak_days,
                phishing_blocked_this_week: phishing_blocked,
                suggestion: STREAK_SUGGESTION,
            },
        })
    }

    /// 30-day active block plus all-time lifetime block
    pub async fn protection_summary(&self, device_id: Uuid) -> Result<ProtectionSummary, StoreError> {
        let today = self.clock.now().date_naive();
        let from = today - Duration::days(SUMMARY_WINDOW_DAYS);

        // Issue counts are of currently-active threats, not windowed.
        let active_threats = self.store.active_threats(device_id).await?;
        let count_by_type = |threat_type: &str| {
            active_threats
                .iter()
                .filter(|t| t.threat_type == threat_type)
                .count() as i64
        };

        let window = self.store.metrics_window_totals(device_id, from, today).await?;
        let lifetime = self.store.metrics_lifetime_totals(device_id).await?;

        Ok(ProtectionSummary {
            scope: "both",
            active_window_days: SUMMARY_WINDOW_DAYS,
            active: ActiveSummary {
                links_scanned: window.links_scanned,
                spam_blocked: window.spam_blocked,
                app_issues: count_by_type(THREAT_TYPE_APP),
                network_issues: count_by_type(THREAT_TYPE_NETWORK),
                device_issues: count_by_type(THREAT_TYPE_DEVICE),
                other_issues: count_by_type(THREAT_TYPE_OTHER),
            },
            lifetime: LifetimeSummary {
                links_scanned: lifetime.links_scanned,
                spam_blocked: lifetime.spam_blocked,
                app_issues: lifetime.app_issues_detected,
                network_issues: lifetime.network_issues_detected,
                device_issues: lifetime.device_issues_detected,
                other_issues: lifetime.other_issues_detected,
            },
        })
    }

    async fn security_component(
        &self,
        device_id: Uuid,
        filter: Option<(&[Uuid], bool)>,
    ) -> Result<SecurityBreakdown, StoreError> {
        let threats = match filter {
            Some((ids, true)) => self.store.active_threats_by_ids(device_id, ids).await?,
            // ignore_other_threats = false keeps every active threat in
            // scope; the id list adds nothing to the selection.
            Some((_, false)) | None => self.store.active_threats(device_id).await?,
        };

        if threats.is_empty() {
            return Ok(SecurityBreakdown::clean());
        }

        let rules = self.store.deduction_rules().await?;
        Ok(security::security_breakdown(&threats, &rules))
    }

    async fn engagement_component(
        &self,
        device_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<i32, StoreError> {
        let since = now - Duration::days(ENGAGEMENT_WINDOW_DAYS);
        let events = self.store.engagement_events_since(device_id, since).await?;
        Ok(engagement::engagement_points(&events))
    }
}

fn compose(
    device_id: Uuid,
    security: SecurityBreakdown,
    engagement_points: i32,
    now: DateTime<Utc>,
) -> ScoreResult {
    let mut total_score = security.security_score + engagement_points + INSURANCE_POINTS;
    if total_score > MAX_TOTAL {
        total_score = MAX_TOTAL;
    }

    let meta = status::classify(total_score);

    ScoreResult {
        device_id,
        total_score,
        status: meta.status.to_string(),
        color_code: meta.color_code.to_string(),
        message: meta.message.to_string(),
        breakdown: ScoreBreakdown {
            security_score: security.security_score,
            security_deductions: security.security_deductions,
            engagement_points,
            insurance_points: INSURANCE_POINTS,
        },
        last_calculated_at: now,
    }
}

fn average(snapshots: &[DailyScoreSnapshot]) -> f64 {
    if snapshots.is_empty() {
        return 0.0;
    }
    snapshots.iter().map(|s| s.total_score as f64).sum::<f64>() / snapshots.len() as f64
}
