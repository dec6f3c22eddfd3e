//! HTTP API handlers for rehab-tracker

pub mod exercises;
pub mod health;
pub mod metrics;
pub mod sessions;
pub mod stats;
pub mod ui;

pub use exercises::exercise_routes;
pub use health::health_routes;
pub use metrics::metrics_routes;
pub use sessions::session_routes;
pub use stats::stats_routes;
pub use ui::ui_routes;

use uuid::Uuid;

use crate::{ApiError, ApiResult};

/// Parse an entity id from a path segment
///
/// A malformed id can never match a stored entity, so it is reported as
/// not found rather than as a bad request.
pub(crate) fn parse_id(kind: &str, raw: &str) -> ApiResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::NotFound(format!("{} not found", kind)))
}
