//! CYBX Protect Cloud Server
//!
//! Computes per-device protection scores for the CYBX mobile app:
//! security deductions from active threats, engagement points from recent
//! activity, and a reserved insurance component, classified into a health
//! tier. Exposes the score, a what-if preview, a weekly trend, and a
//! protection summary over HTTP.

mod config;
mod db;
mod error;
mod handlers;
mod models;
mod score;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::net::SocketAddr;

use score::clock::SystemClock;
use score::engine::ScoreEngine;
use score::store::PgStore;

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "cybx_protect=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("CYBX Protect server starting...");
    tracing::info!("Database: {}", config.database_url.split('@').last().unwrap_or("***"));

    // Initialize database pool
    let pool = db::create_pool(&config.database_url)
        .await
        .context("failed to create database pool")?;

    // Run migrations
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool)
        .await
        .context("failed to run migrations")?;

    // Build application state
    let state = AppState {
        engine: ScoreEngine::new(PgStore::new(pool), SystemClock),
        config: config.clone(),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub engine: ScoreEngine<PgStore, SystemClock>,
    pub config: config::Config,
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/v1/devices/:device_id/score", get(handlers::score::get_score))
        .route("/v1/devices/:device_id/score/preview", post(handlers::score::preview_score))
        .route("/v1/devices/:device_id/score/weekly-progress", get(handlers::reports::weekly_progress))
        .route("/v1/devices/:device_id/protection-summary", get(handlers::reports::protection_summary))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
