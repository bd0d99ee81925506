//! Database module - PostgreSQL connection and migrations

use sqlx::{postgres::PgPoolOptions, Executor, PgPool};

/// Create database connection pool
pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    // Create tables if not exist. Plain execute so the multi-statement
    // schema runs over the simple query protocol.
    pool.execute(SCHEMA_SQL).await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Threats detected on a device (ingested by the SDK pipeline, read-only here)
CREATE TABLE IF NOT EXISTS threat_details (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    device_id UUID NOT NULL,
    threat_type VARCHAR(50) NOT NULL,
    severity VARCHAR(10) NOT NULL,
    status VARCHAR(10) NOT NULL,
    detected_at TIMESTAMPTZ NOT NULL,
    resolved_at TIMESTAMPTZ,
    source VARCHAR(100),
    raw_payload JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Deduction reference data, one row per (threat_type, severity)
CREATE TABLE IF NOT EXISTS security_deduction_rules (
    id SERIAL PRIMARY KEY,
    threat_type VARCHAR(50) NOT NULL,
    severity VARCHAR(10) NOT NULL,
    deduction INT NOT NULL,
    UNIQUE (threat_type, severity)
);

-- User activity events, append-only
CREATE TABLE IF NOT EXISTS engagement_events (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    device_id UUID NOT NULL,
    event_type VARCHAR(50) NOT NULL,
    occurred_at TIMESTAMPTZ NOT NULL,
    points INT NOT NULL DEFAULT 2,
    meta JSONB,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- Latest computed score, one row per device
CREATE TABLE IF NOT EXISTS device_current_scores (
    device_id UUID PRIMARY KEY,
    total_score INT NOT NULL DEFAULT 0,
    security_score INT NOT NULL DEFAULT 0,
    security_deductions INT NOT NULL DEFAULT 0,
    engagement_points INT NOT NULL DEFAULT 0,
    insurance_points INT NOT NULL DEFAULT 0,
    status VARCHAR(20) NOT NULL DEFAULT 'critical',
    color_code VARCHAR(10) NOT NULL DEFAULT '#FF3B30',
    last_calculated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    current_streak_days INT NOT NULL DEFAULT 0,
    phishing_week_count INT NOT NULL DEFAULT 0
);

-- One score snapshot per device per calendar day
CREATE TABLE IF NOT EXISTS device_daily_scores (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    device_id UUID NOT NULL,
    date DATE NOT NULL,
    total_score INT NOT NULL,
    components JSONB,
    status VARCHAR(20) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (device_id, date)
);

-- Daily protection counters (written by the ingestion pipeline, read-only here)
CREATE TABLE IF NOT EXISTS protection_metrics_daily (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    device_id UUID NOT NULL,
    date DATE NOT NULL,
    links_scanned INT NOT NULL DEFAULT 0,
    spam_blocked INT NOT NULL DEFAULT 0,
    app_issues_detected INT NOT NULL DEFAULT 0,
    network_issues_detected INT NOT NULL DEFAULT 0,
    device_issues_detected INT NOT NULL DEFAULT 0,
    other_issues_detected INT NOT NULL DEFAULT 0,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (device_id, date)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_threats_device_status ON threat_details(device_id, status);
CREATE INDEX IF NOT EXISTS idx_engagement_device_occurred ON engagement_events(device_id, occurred_at);
CREATE INDEX IF NOT EXISTS idx_daily_scores_device_date ON device_daily_scores(device_id, date);
CREATE INDEX IF NOT EXISTS idx_metrics_device_date ON protection_metrics_daily(device_id, date);
"#;
