//! Data models

pub mod threat;
pub mod deduction_rule;
pub mod engagement;
pub mod current_score;
pub mod daily_score;
pub mod daily_metrics;

pub use threat::*;
pub use deduction_rule::*;
pub use engagement::*;
pub use current_score::*;
pub use daily_score::*;
pub use daily_metrics::*;
