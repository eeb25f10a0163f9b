//! Check-in API Handlers
//!
//! Both entry points capture a single `now` and read the settings row
//! fresh, then hand off to the check-in resolver.

use axum::{Json, extract::State};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};

use crate::audit_log;
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::settings;
use crate::ordering::{self, CheckinContext, CheckinOutcome};
use crate::utils::validation::{MAX_SHORT_TEXT_LEN, validate_required_text};
use crate::utils::{AppError, AppResult};
use shared::models::Reservation;

const RESOURCE: &str = "reservation";

/// QR check-in request
#[derive(Debug, Deserialize)]
pub struct QrCheckinRequest {
    /// Scanned payload (rendered form) or the raw reservation token
    pub token: String,
    /// Canteen the operator is stationed at
    pub canteen_id: Option<i64>,
    /// Optional check-in photo, base64-encoded
    pub photo_base64: Option<String>,
}

/// Manual check-in request
#[derive(Debug, Deserialize)]
pub struct ManualCheckinRequest {
    /// Badge number, national id, or name fragment
    pub identifier: String,
    pub canteen_id: Option<i64>,
    pub photo_base64: Option<String>,
}

/// Check-in response
///
/// `already_checked_in` marks the benign repeat-scan outcome; the
/// reservation then carries the original check-in time and operator.
#[derive(Debug, Serialize)]
pub struct CheckinResponse {
    pub reservation: Reservation,
    pub already_checked_in: bool,
}

fn build_context(
    state: &ServerState,
    user: &CurrentUser,
    canteen_id: Option<i64>,
    photo_base64: Option<&str>,
) -> AppResult<CheckinContext> {
    let photo_ref = match photo_base64 {
        Some(encoded) => {
            let bytes = BASE64_STANDARD
                .decode(encoded)
                .map_err(|_| AppError::validation("photo_base64 is not valid base64"))?;
            Some(state.photo_store.save(&bytes)?)
        }
        None => None,
    };
    Ok(CheckinContext {
        operator_id: user.id,
        canteen_id,
        photo_ref,
    })
}

fn respond(state: &ServerState, outcome: CheckinOutcome, now: i64) -> Json<CheckinResponse> {
    let already_checked_in = !outcome.is_new();
    let res = outcome.reservation().clone();

    if !already_checked_in {
        let id = res.id.to_string();
        audit_log!(
            "order_checkin",
            reservation_id = res.id,
            diner_id = res.diner_id,
            operator_id = res.checked_in_by.unwrap_or_default(),
            order_date = %res.order_date
        );
        state.publish_event("order:checkin", &res, now);
        state.broadcast_sync(RESOURCE, "checked_in", &id, Some(&res));
    }

    Json(CheckinResponse {
        reservation: res,
        already_checked_in,
    })
}

/// POST /api/checkin/qr - 扫码取餐核销
pub async fn qr(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<QrCheckinRequest>,
) -> AppResult<Json<CheckinResponse>> {
    user.require_operator()?;
    validate_required_text(&payload.token, "token", MAX_SHORT_TEXT_LEN * 2)?;

    let now = shared::util::now_millis();
    let tz = state.config.timezone;
    let settings = settings::get(&state.pool).await?;

    let token = state
        .token_render
        .decode(&payload.token)
        .ok_or_else(|| AppError::validation("token is not a valid QR payload"))?;

    let ctx = build_context(&state, &user, payload.canteen_id, payload.photo_base64.as_deref())?;
    let outcome =
        ordering::check_in_by_token(&state.pool, &settings, tz, &token, &ctx, now).await?;

    Ok(respond(&state, outcome, now))
}

/// POST /api/checkin/manual - 人工查找取餐核销
pub async fn manual(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<ManualCheckinRequest>,
) -> AppResult<Json<CheckinResponse>> {
    user.require_operator()?;
    validate_required_text(&payload.identifier, "identifier", MAX_SHORT_TEXT_LEN)?;

    let now = shared::util::now_millis();
    let tz = state.config.timezone;
    let settings = settings::get(&state.pool).await?;

    let ctx = build_context(&state, &user, payload.canteen_id, payload.photo_base64.as_deref())?;
    let outcome =
        ordering::check_in_manual(&state.pool, &settings, tz, &payload.identifier, &ctx, now)
            .await?;

    Ok(respond(&state, outcome, now))
}
