//! Order Admission Controller
//!
//! Orchestrates duplicate check, holiday guard, cutoff resolver and
//! capacity guard, then persists the reservation in ORDERED. All
//! rejections are local validation failures surfaced to the caller;
//! none are retried.

use sqlx::SqlitePool;

use crate::db::repository::{RepoError, canteen, reservation, shift};
use crate::ordering::{cutoff, guards};
use crate::utils::{AppError, AppResult, ErrorCode, time};
use chrono_tz::Tz;
use serde::Deserialize;
use shared::models::{OrderingSettings, Reservation, ReservationCreate};

/// Create reservation request
#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionRequest {
    pub shift_id: i64,
    /// Target calendar date (YYYY-MM-DD)
    pub order_date: String,
    pub canteen_id: Option<i64>,
}

/// Admit and persist a new reservation for `diner_id`.
///
/// `now_millis` is the instant captured at request entry; every time
/// computation below derives from it.
pub async fn create_reservation(
    pool: &SqlitePool,
    settings: &OrderingSettings,
    tz: Tz,
    diner_id: i64,
    req: &AdmissionRequest,
    now_millis: i64,
) -> AppResult<Reservation> {
    let order_date = time::parse_date(&req.order_date)?;
    let today = time::local_date(now_millis, tz);
    if order_date < today {
        return Err(AppError::validation("Order date is in the past"));
    }

    if reservation::find_active_by_diner_date(pool, diner_id, &req.order_date)
        .await?
        .is_some()
    {
        return Err(AppError::duplicate_reservation(&req.order_date));
    }

    guards::check_holiday(pool, &req.order_date, req.shift_id).await?;

    let shift = shift::find_by_id(pool, req.shift_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ShiftNotFound))?;
    if !shift.is_active {
        return Err(AppError::new(ErrorCode::ShiftInactive));
    }
    let shift_start = shift.start().ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ConfigError,
            format!("Shift {} has a malformed start_time", shift.id),
        )
    })?;

    let policy = settings.cutoff_policy()?;
    cutoff::evaluate(&policy, order_date, shift_start, tz, now_millis).into_result()?;

    if let Some(canteen_id) = req.canteen_id {
        let canteen = canteen::find_by_id(pool, canteen_id)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::new(ErrorCode::CanteenNotFound))?;
        guards::check_capacity(pool, &canteen, req.shift_id, &req.order_date).await?;
    }

    let created = reservation::create(
        pool,
        ReservationCreate {
            diner_id,
            shift_id: shift.id,
            canteen_id: req.canteen_id,
            order_date: req.order_date.clone(),
            qr_token: shared::util::opaque_token(),
            meal_price: shift.meal_price,
        },
    )
    .await
    .map_err(|e| match e {
        // Concurrent create lost against the partial unique index
        RepoError::Duplicate(_) => AppError::duplicate_reservation(&req.order_date),
        other => other.into(),
    })?;

    Ok(created)
}
