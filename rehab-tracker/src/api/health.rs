//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok" whenever the process answers)
    pub status: String,
    /// Module name ("rehab-tracker")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Git hash captured at build time
    pub build: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// Database probe result ("ok" or "error")
    pub db: String,
}

/// GET /health
///
/// Runs a trivial query to check the database. A failing database is
/// reported in the body, not as an error status.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = rehab_common::time::now().signed_duration_since(state.startup_time);

    let db = match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&state.db).await {
        Ok(_) => "ok",
        Err(e) => {
            warn!("Health check database probe failed: {}", e);
            "error"
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "rehab-tracker".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: env!("GIT_HASH").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        db: db.to_string(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
