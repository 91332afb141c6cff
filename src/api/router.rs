use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::trace::TraceLayer;

use super::health;
use super::query;
use super::state::AppState;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .route("/v1/query", post(query::answer_query))
        .route(
            "/v1/collections/{collection_id}",
            delete(query::clear_collection),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
