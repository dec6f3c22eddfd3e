//! Prometheus scrape endpoint

use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{ApiError, ApiResult, AppState};

/// GET /metrics
pub async fn serve_metrics(State(state): State<AppState>) -> ApiResult<Response> {
    let (content_type, body) = state
        .metrics
        .render()
        .map_err(|e| ApiError::Internal(format!("Failed to encode metrics: {}", e)))?;
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

pub fn metrics_routes() -> Router<AppState> {
    Router::new().route("/metrics", get(serve_metrics))
}
