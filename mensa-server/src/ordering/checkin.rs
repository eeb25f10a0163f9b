//! Check-in Resolver
//!
//! Resolves a presented identity — an exact QR token or a fuzzy manual
//! identifier — to exactly one eligible reservation and drives the
//! ORDERED → PICKED_UP transition at most once.
//!
//! A reservation that is already PICKED_UP is a benign outcome, not an
//! error: the caller gets the existing record (including who checked it
//! in and when) so double scans and concurrent operators stay harmless.

use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::db::repository::{diner, reservation, shift};
use crate::ordering::{guards, window};
use crate::utils::{AppError, AppResult, ErrorCode, time};
use shared::models::{Diner, OrderingSettings, Reservation, ReservationStatus, Shift};

/// Operator-side context for a check-in request
#[derive(Debug, Clone)]
pub struct CheckinContext {
    pub operator_id: i64,
    /// Canteen the operator is stationed at, if declared
    pub canteen_id: Option<i64>,
    /// Stored photo reference, if a photo was taken
    pub photo_ref: Option<String>,
}

/// Check-in result
#[derive(Debug, Clone)]
pub enum CheckinOutcome {
    /// This call performed the transition
    CheckedIn(Reservation),
    /// The reservation was already picked up; carries the winning record
    AlreadyCheckedIn(Reservation),
}

impl CheckinOutcome {
    pub fn reservation(&self) -> &Reservation {
        match self {
            Self::CheckedIn(r) | Self::AlreadyCheckedIn(r) => r,
        }
    }

    /// Whether this call performed the transition (drives event emission)
    pub fn is_new(&self) -> bool {
        matches!(self, Self::CheckedIn(_))
    }
}

/// QR path: exact token lookup, then the shared finalization.
pub async fn check_in_by_token(
    pool: &SqlitePool,
    settings: &OrderingSettings,
    tz: Tz,
    qr_token: &str,
    ctx: &CheckinContext,
    now_millis: i64,
) -> AppResult<CheckinOutcome> {
    let res = reservation::find_by_token(pool, qr_token)
        .await?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::ReservationNotFound,
                "No reservation matches this code",
            )
        })?;
    finalize(pool, settings, tz, res, ctx, now_millis).await
}

/// Manual lookup strategies, tried in a fixed priority order.
enum LookupStrategy<'a> {
    ByBadge(&'a str),
    ByNationalId(&'a str),
    ByName(&'a str),
}

async fn resolve_diner(pool: &SqlitePool, identifier: &str) -> AppResult<Diner> {
    let strategies = [
        LookupStrategy::ByBadge(identifier),
        LookupStrategy::ByNationalId(identifier),
        LookupStrategy::ByName(identifier),
    ];
    for strategy in strategies {
        let found = match strategy {
            LookupStrategy::ByBadge(v) => diner::find_by_badge_no(pool, v).await?,
            LookupStrategy::ByNationalId(v) => diner::find_by_national_id(pool, v).await?,
            LookupStrategy::ByName(v) => diner::find_by_name(pool, v).await?,
        };
        if let Some(d) = found {
            return Ok(d);
        }
    }
    Err(AppError::new(ErrorCode::DinerNotFound))
}

/// Manual path: resolve the diner, pick the candidate reservation, then
/// the shared finalization.
///
/// Candidate tie-break:
/// 1. Yesterday's reservation, when its shift is overnight and the
///    service window still reaches into today.
/// 2. Today's reservation — selected even when its window has already
///    closed, so the window check names that reservation in the
///    rejection instead of reporting nothing found.
/// 3. Otherwise there is nothing to check in.
pub async fn check_in_manual(
    pool: &SqlitePool,
    settings: &OrderingSettings,
    tz: Tz,
    identifier: &str,
    ctx: &CheckinContext,
    now_millis: i64,
) -> AppResult<CheckinOutcome> {
    let diner = resolve_diner(pool, identifier).await?;

    let today = time::local_date(now_millis, tz);
    let today_str = today.format("%Y-%m-%d").to_string();

    // An overnight reservation from yesterday whose window has already
    // closed is still worth remembering: if nothing else matches, it is
    // selected so the rejection names it explicitly.
    let mut stale_overnight: Option<Reservation> = None;

    if let Some(yesterday) = today.pred_opt() {
        let yesterday_str = yesterday.format("%Y-%m-%d").to_string();
        if let Some(candidate) =
            reservation::find_ordered_by_diner_date(pool, diner.id, &yesterday_str).await?
        {
            let shift = fetch_shift(pool, &candidate).await?;
            if shift.is_overnight() {
                if window::validate(
                    &shift,
                    yesterday,
                    tz,
                    settings.checkin_grace_minutes,
                    now_millis,
                )
                .is_valid()
                {
                    return finalize(pool, settings, tz, candidate, ctx, now_millis).await;
                }
                stale_overnight = Some(candidate);
            }
        }
    }

    if let Some(candidate) =
        reservation::find_ordered_by_diner_date(pool, diner.id, &today_str).await?
    {
        // Selected even when its window has closed: the window check
        // below produces an explicit rejection naming this reservation.
        return finalize(pool, settings, tz, candidate, ctx, now_millis).await;
    }

    if let Some(candidate) = stale_overnight {
        return finalize(pool, settings, tz, candidate, ctx, now_millis).await;
    }

    Err(AppError::new(ErrorCode::NoActiveReservation))
}

async fn fetch_shift(pool: &SqlitePool, res: &Reservation) -> AppResult<Shift> {
    shift::find_by_id(pool, res.shift_id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::ShiftNotFound,
            format!("Shift {} referenced by reservation {} is missing", res.shift_id, res.id),
        )
    })
}

/// Shared tail of both paths: terminal-state handling, canteen guard,
/// window validation and the conditional transition.
async fn finalize(
    pool: &SqlitePool,
    settings: &OrderingSettings,
    tz: Tz,
    res: Reservation,
    ctx: &CheckinContext,
    now_millis: i64,
) -> AppResult<CheckinOutcome> {
    match res.status {
        ReservationStatus::PickedUp => return Ok(CheckinOutcome::AlreadyCheckedIn(res)),
        ReservationStatus::Cancelled => {
            return Err(AppError::with_message(
                ErrorCode::ReservationCancelled,
                format!("Reservation for {} was cancelled", res.order_date),
            ));
        }
        ReservationStatus::NoShow => {
            return Err(AppError::already_final(res.status.as_str()));
        }
        ReservationStatus::Ordered => {}
    }

    guards::check_canteen_binding(pool, settings.enforce_canteen_checkin, &res, ctx.canteen_id)
        .await?;

    let shift = fetch_shift(pool, &res).await?;
    let order_date = res.order_date_naive().ok_or_else(|| {
        AppError::internal(format!("Reservation {} has a malformed order_date", res.id))
    })?;
    window::validate(&shift, order_date, tz, settings.checkin_grace_minutes, now_millis)
        .into_result(&res.order_date)?;

    let rows = reservation::mark_picked_up(
        pool,
        res.id,
        ctx.operator_id,
        ctx.photo_ref.as_deref(),
        now_millis,
    )
    .await?;

    let current = reservation::find_by_id(pool, res.id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ReservationNotFound))?;

    if rows == 0 {
        // Lost the race against a concurrent caller: report the state
        // they produced instead of failing.
        return match current.status {
            ReservationStatus::PickedUp => Ok(CheckinOutcome::AlreadyCheckedIn(current)),
            ReservationStatus::Cancelled => Err(AppError::with_message(
                ErrorCode::ReservationCancelled,
                format!("Reservation for {} was cancelled", current.order_date),
            )),
            _ => Err(AppError::already_final(current.status.as_str())),
        };
    }

    Ok(CheckinOutcome::CheckedIn(current))
}
