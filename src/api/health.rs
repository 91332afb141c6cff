//! Health check endpoints

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;

use super::state::AppState;

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// Aggregate health response with per-backend status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    pub cache: bool,
    pub vectordb: bool,
}

/// GET /health - aggregate readiness of the cache and vector store
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let backends = state.query_service.health().await;

    let status = if backends.all_healthy() {
        HealthStatus::Healthy
    } else {
        HealthStatus::Unhealthy
    };

    let response = HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        cache: backends.cache,
        vectordb: backends.vector_db,
    };

    let status_code = match status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// GET /live - liveness probe, returns 200 while the process runs
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}
