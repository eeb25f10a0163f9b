//! Order API 模块 (订餐管理)

mod handler;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::auth::rate_limit;
use crate::core::ServerState;

pub fn router(state: ServerState) -> Router<ServerState> {
    Router::new().nest("/api/orders", routes(state))
}

fn routes(state: ServerState) -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            post(handler::create).layer(middleware::from_fn_with_state(
                state.clone(),
                rate_limit::order_rate_limit,
            )),
        )
        .route("/mine", get(handler::list_mine))
        .route("/{id}", get(handler::get_by_id))
        .route(
            "/{id}/cancel",
            post(handler::cancel).layer(middleware::from_fn_with_state(
                state,
                rate_limit::cancel_rate_limit,
            )),
        )
}
