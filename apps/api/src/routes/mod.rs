pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};

use crate::analytics::handlers::handle_get_analytics;
use crate::guards::{bot::bot_guard, rate_limit::rate_limit};
use crate::icebreakers::handlers::handle_generate;
use crate::state::AppState;

/// Request bodies above this size are rejected with 413 on the generation route.
pub const MAX_PAYLOAD_BYTES: usize = 10 * 1024;

pub fn build_router(state: AppState) -> Router {
    let generation = Router::new()
        .route("/api/generate-icebreakers", post(handle_generate))
        .route_layer(middleware::from_fn(bot_guard))
        .layer(DefaultBodyLimit::max(MAX_PAYLOAD_BYTES));

    Router::new()
        .merge(generation)
        .route("/api/analytics", get(handle_get_analytics))
        .layer(middleware::from_fn_with_state(state.clone(), rate_limit))
        // Registered after the limiter so health checks are never throttled
        .route("/api/health", get(health::health_handler))
        .with_state(state)
}
