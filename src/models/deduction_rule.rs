//! Security deduction rule model

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Reference data: how many points a (threat_type, severity) pair deducts.
/// Unique per pair, rarely mutated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DeductionRule {
    pub id: i32,
    pub threat_type: String,
    pub severity: String,
    pub deduction: i32,
}

impl DeductionRule {
    pub async fn load_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, DeductionRule>("SELECT * FROM security_deduction_rules")
            .fetch_all(pool)
            .await
    }
}
