//! Cancellation Controller
//!
//! Cancellation is gated by the same cutoff formula as creation, run
//! against the order's own shift and date.

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::auth::Role;
use crate::db::repository::{reservation, shift};
use crate::ordering::cutoff;
use crate::utils::{AppError, AppResult, ErrorCode, time};
use shared::models::{OrderingSettings, Reservation, ReservationStatus};

/// Who is cancelling, and why
#[derive(Debug, Clone)]
pub struct CancelContext {
    pub actor_id: i64,
    pub actor_role: Role,
    pub reason: Option<String>,
}

impl CancelContext {
    /// Reason recorded when the caller gave none, derived from the role
    fn effective_reason(&self) -> String {
        match &self.reason {
            Some(r) => r.clone(),
            None => match self.actor_role {
                Role::Diner => "Cancelled by diner".to_string(),
                Role::Operator | Role::Admin => "Cancelled by staff".to_string(),
            },
        }
    }
}

/// Cancel an ORDERED reservation.
///
/// Terminal reservations resolve to `ReservationAlreadyFinal` — repeated
/// cancels observe the first cancellation instead of producing a second
/// one, and a PICKED_UP reservation can never be cancelled.
pub async fn cancel_reservation(
    pool: &SqlitePool,
    settings: &OrderingSettings,
    tz: Tz,
    reservation_id: i64,
    ctx: &CancelContext,
    now_millis: i64,
) -> AppResult<Reservation> {
    let res = reservation::find_by_id(pool, reservation_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;

    // Diners may only cancel their own reservations
    if ctx.actor_role == Role::Diner && res.diner_id != ctx.actor_id {
        return Err(AppError::forbidden("Cannot cancel another diner's reservation"));
    }

    if res.status != ReservationStatus::Ordered {
        return Err(AppError::already_final(res.status.as_str()));
    }

    let shift = shift::find_by_id(pool, res.shift_id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ShiftNotFound,
            format!("Shift {} referenced by reservation {} is missing", res.shift_id, res.id),
        )
    })?;
    let order_date = res.order_date_naive().ok_or_else(|| {
        AppError::internal(format!("Reservation {} has a malformed order_date", res.id))
    })?;
    let shift_start = shift.start().ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ConfigError,
            format!("Shift {} has a malformed start_time", shift.id),
        )
    })?;

    // Too late to cancel = too late to have ordered: any refusal from the
    // shared resolver means the cancellation deadline has passed.
    let policy = settings.cutoff_policy()?;
    let decision = cutoff::evaluate(&policy, order_date, shift_start, tz, now_millis);
    if !decision.allowed {
        return Err(match decision.cutoff_at {
            Some(at) => AppError::cutoff_passed(at),
            None => AppError::with_message(
                ErrorCode::OrderCutoffPassed,
                "Cancellation deadline has passed",
            ),
        });
    }

    let reason = ctx.effective_reason();
    let rows = reservation::cancel(pool, res.id, ctx.actor_id, &reason, now_millis).await?;

    let current = reservation::find_by_id(pool, res.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;

    if rows == 0 {
        // A concurrent caller finalized the reservation first
        return Err(AppError::already_final(current.status.as_str()));
    }

    tracing::info!(
        target: "audit",
        reservation_id = res.id,
        actor_id = ctx.actor_id,
        role = ctx.actor_role.as_str(),
        reason = %reason,
        "reservation cancelled"
    );

    Ok(current)
}
