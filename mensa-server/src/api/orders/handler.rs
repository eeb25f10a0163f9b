//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};

use crate::audit_log;
use crate::auth::{CurrentUser, Role};
use crate::core::ServerState;
use crate::db::repository::{reservation, settings};
use crate::ordering::{self, AdmissionRequest, CancelContext};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult};
use shared::models::Reservation;

const RESOURCE: &str = "reservation";

/// Created reservation plus the renderable token encoding
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub reservation: Reservation,
    /// Payload the client feeds into its QR widget
    pub qr_payload: String,
}

/// POST /api/orders - 创建订餐
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<AdmissionRequest>,
) -> AppResult<Json<CreateOrderResponse>> {
    let now = shared::util::now_millis();
    let tz = state.config.timezone;

    // Configuration is read fresh per request, never cached
    let settings = settings::get(&state.pool).await?;

    let res =
        ordering::create_reservation(&state.pool, &settings, tz, user.id, &payload, now).await?;

    let id = res.id.to_string();

    audit_log!(
        "order_created",
        reservation_id = res.id,
        diner_id = user.id,
        order_date = %res.order_date,
        shift_id = res.shift_id
    );

    state.publish_event("order:created", &res, now);
    state.broadcast_sync(RESOURCE, "created", &id, Some(&res));

    let qr_payload = state.token_render.render(&res.qr_token);
    Ok(Json(CreateOrderResponse {
        reservation: res,
        qr_payload,
    }))
}

/// Cancel request body
#[derive(Debug, Deserialize, Default)]
pub struct CancelOrderRequest {
    pub reason: Option<String>,
}

/// POST /api/orders/{id}/cancel - 取消订餐
pub async fn cancel(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CancelOrderRequest>,
) -> AppResult<Json<Reservation>> {
    validate_optional_text(&payload.reason, "reason", MAX_NOTE_LEN)?;

    let now = shared::util::now_millis();
    let tz = state.config.timezone;
    let settings = settings::get(&state.pool).await?;

    let ctx = CancelContext {
        actor_id: user.id,
        actor_role: user.role,
        reason: payload.reason,
    };
    let res = ordering::cancel_reservation(&state.pool, &settings, tz, id, &ctx, now).await?;

    let id_str = res.id.to_string();
    state.publish_event("order:cancelled", &res, now);
    state.broadcast_sync(RESOURCE, "cancelled", &id_str, Some(&res));

    Ok(Json(res))
}

/// GET /api/orders/{id} - 获取单个订餐
pub async fn get_by_id(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let res = reservation::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(shared::error::ErrorCode::ReservationNotFound))?;

    // Diners may only see their own reservations
    if user.role == Role::Diner && res.diner_id != user.id {
        return Err(AppError::forbidden("Cannot view another diner's reservation"));
    }

    Ok(Json(res))
}

/// Query params for listing own reservations
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i32,
    #[serde(default)]
    pub offset: i32,
}

fn default_limit() -> i32 {
    50
}

/// GET /api/orders - 获取本人订餐列表
pub async fn list_mine(
    State(state): State<ServerState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Reservation>>> {
    let rows =
        reservation::find_by_diner(&state.pool, user.id, query.limit.clamp(1, 200), query.offset)
            .await?;
    Ok(Json(rows))
}
