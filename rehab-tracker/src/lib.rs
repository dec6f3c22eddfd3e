//! rehab-tracker library - knee rehab habit tracker HTTP service
//!
//! Exercises and logged sessions over a JSON REST API, weekly adherence and
//! progress statistics, and a small embedded web UI.

use std::sync::Arc;

use axum::{middleware, Router};
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod extract;
pub mod metrics;

pub use crate::error::{ApiError, ApiResult};
pub use crate::metrics::Metrics;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
    /// Source of "today" for statistics windows
    pub today: fn() -> NaiveDate,
    /// Prometheus registry and counters
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Create new application state using the local calendar date as today
    ///
    /// Fails only if the metrics registry rejects a collector.
    pub fn new(db: SqlitePool) -> prometheus::Result<Self> {
        Ok(Self {
            db,
            startup_time: rehab_common::time::now(),
            today: rehab_common::time::today,
            metrics: Arc::new(Metrics::new()?),
        })
    }

    /// Replace the calendar used for "today" (fixed dates in tests)
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .merge(api::exercise_routes())
        .merge(api::session_routes())
        .merge(api::stats_routes())
        .merge(api::metrics_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            metrics::track_requests,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
