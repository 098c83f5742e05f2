//! Health check and metrics endpoints.
//!
//! These endpoints are used by load balancers and monitoring systems
//! to verify service health.

use crate::error::AppError;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode};

/// Service banner.
///
/// ```text
/// GET /
/// ```
#[allow(clippy::unused_async)]
pub async fn root() -> &'static str {
    "OK"
}

/// Simple health check endpoint (for basic liveness).
///
/// Returns 200 OK to indicate the service is running.
/// This endpoint does NOT check dependencies (user database, etc.).
///
/// ```text
/// GET /health
/// ```
#[allow(clippy::unused_async)]
pub async fn health_check() -> (StatusCode, &'static str) {
    (StatusCode::OK, "ok")
}

/// Prometheus text exposition.
///
/// ```text
/// GET /metrics
/// ```
///
/// # Errors
///
/// Returns 404 when metrics export is disabled.
#[allow(clippy::unused_async)]
pub async fn metrics<U>(State(state): State<AppState<U>>) -> Result<String, AppError> {
    state
        .metrics
        .as_ref()
        .map(metrics_exporter_prometheus::PrometheusHandle::render)
        .ok_or_else(|| AppError::not_found("Metrics are disabled"))
}
