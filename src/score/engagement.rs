//! Engagement score calculation

use crate::models::EngagementEvent;

/// Maximum points the engagement component can hold
pub const MAX_ENGAGEMENT: i32 = 10;

/// Trailing window over activity events, in days. Rolling, not
/// calendar-aligned: the cutoff is exactly now minus seven days.
pub const ENGAGEMENT_WINDOW_DAYS: i64 = 7;

/// Sum event points, capped at MAX_ENGAGEMENT. Points are non-negative so
/// no lower clamp is needed.
pub fn engagement_points(events: &[EngagementEvent]) -> i32 {
    let total: i32 = events.iter().map(|e| e.points).sum();
    total.min(MAX_ENGAGEMENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn event(points: i32) -> EngagementEvent {
        EngagementEvent {
            id: Uuid::new_v4(),
            device_id: Uuid::new_v4(),
            event_type: "DAILY_ACTIVE".to_string(),
            occurred_at: Utc::now(),
            points,
            meta: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn no_events_scores_zero() {
        assert_eq!(engagement_points(&[]), 0);
    }

    #[test]
    fn points_sum_across_events() {
        let events = vec![event(2), event(2), event(3)];
        assert_eq!(engagement_points(&events), 7);
    }

    #[test]
    fn sum_caps_at_max() {
        let events = vec![event(2); 6];
        assert_eq!(engagement_points(&events), MAX_ENGAGEMENT);
    }
}
