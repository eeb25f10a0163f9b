//! HTTP API 路由组合

pub mod checkin;
pub mod health;
pub mod orders;

use axum::Router;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Compose all API routers and ambient layers into the application router.
pub fn router(state: ServerState) -> Router {
    let timeout = Duration::from_millis(state.config.request_timeout_ms);

    Router::new()
        .merge(health::router())
        .merge(orders::router(state.clone()))
        .merge(checkin::router(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(timeout))
        .with_state(state)
}
