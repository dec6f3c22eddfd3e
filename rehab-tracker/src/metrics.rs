//! Prometheus metrics
//!
//! Each [`AppState`](crate::AppState) owns its own registry so routers built
//! side by side (as in tests) never collide on registration.

use std::time::{Duration, Instant};

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

use crate::AppState;

pub struct Metrics {
    registry: Registry,
    http_requests: IntCounterVec,
    http_duration: HistogramVec,
    exercises_created: IntCounter,
    sessions_logged: IntCounter,
}

impl Metrics {
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let http_requests = IntCounterVec::new(
            Opts::new("rehab_http_requests_total", "HTTP requests by route and status"),
            &["method", "route", "status"],
        )?;
        let http_duration = HistogramVec::new(
            HistogramOpts::new(
                "rehab_http_request_duration_seconds",
                "HTTP request latency by route",
            ),
            &["method", "route"],
        )?;
        let exercises_created =
            IntCounter::new("rehab_exercises_created_total", "Exercises created")?;
        let sessions_logged = IntCounter::new("rehab_sessions_logged_total", "Sessions logged")?;

        registry.register(Box::new(http_requests.clone()))?;
        registry.register(Box::new(http_duration.clone()))?;
        registry.register(Box::new(exercises_created.clone()))?;
        registry.register(Box::new(sessions_logged.clone()))?;

        Ok(Self {
            registry,
            http_requests,
            http_duration,
            exercises_created,
            sessions_logged,
        })
    }

    pub fn observe_request(&self, method: &str, route: &str, status: u16, elapsed: Duration) {
        let status = status.to_string();
        self.http_requests
            .with_label_values(&[method, route, status.as_str()])
            .inc();
        self.http_duration
            .with_label_values(&[method, route])
            .observe(elapsed.as_secs_f64());
    }

    pub fn exercise_created(&self) {
        self.exercises_created.inc();
    }

    pub fn session_logged(&self) {
        self.sessions_logged.inc();
    }

    /// Text exposition format: (content type, body)
    pub fn render(&self) -> prometheus::Result<(String, Vec<u8>)> {
        let encoder = TextEncoder::new();
        let mut body = Vec::new();
        encoder.encode(&self.registry.gather(), &mut body)?;
        Ok((encoder.format_type().to_string(), body))
    }
}

/// Route middleware counting every matched request
pub async fn track_requests(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    state
        .metrics
        .observe_request(&method, &route, response.status().as_u16(), started.elapsed());
    response
}
