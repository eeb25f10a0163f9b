//! Check-in API 模块 (取餐核销)

mod handler;

use axum::{Router, middleware, routing::post};

use crate::auth::rate_limit;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/checkin", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route("/qr", post(handler::qr))
        .route("/manual", post(handler::manual))
        .route_layer(middleware::from_fn_with_state(
            state,
            rate_limit::checkin_rate_limit,
        ))
}
