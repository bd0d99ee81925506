//! Wall clock abstraction

use chrono::{DateTime, Utc};

/// Source of "now" for score calculations. Every date the engine derives
/// (snapshot day, trend windows, engagement cutoff) flows through this.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// System UTC clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
