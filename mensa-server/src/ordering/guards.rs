//! Holiday, capacity and canteen enforcement guards

use sqlx::SqlitePool;

use crate::db::repository::{canteen, holiday, reservation};
use crate::utils::{AppError, AppResult};
use shared::models::{Canteen, Reservation};

/// Reject the date if an active holiday blocks it for this shift.
///
/// The message distinguishes a shift-specific holiday from a blanket one.
pub async fn check_holiday(pool: &SqlitePool, order_date: &str, shift_id: i64) -> AppResult<()> {
    if let Some(h) = holiday::find_active_for(pool, order_date, shift_id).await? {
        let msg = match h.shift_id {
            Some(_) => format!("{}: this shift is not served on {}", h.name, order_date),
            None => format!("{}: no meals are served on {}", h.name, order_date),
        };
        return Err(AppError::holiday(msg).with_detail("date", order_date));
    }
    Ok(())
}

/// Reject when the canteen's daily capacity for (shift, date) is reached.
///
/// A null capacity means unlimited.
pub async fn check_capacity(
    pool: &SqlitePool,
    canteen: &Canteen,
    shift_id: i64,
    order_date: &str,
) -> AppResult<()> {
    let Some(capacity) = canteen.daily_capacity else {
        return Ok(());
    };
    let count = reservation::count_active_for_canteen(pool, canteen.id, shift_id, order_date).await?;
    if count >= capacity {
        return Err(AppError::capacity_full(&canteen.name, capacity));
    }
    Ok(())
}

/// Canteen enforcement: active only when the global flag is set and the
/// check-in request declares an operator canteen. Reservations with no
/// bound canteen are exempt; a mismatch names the bound canteen so the
/// operator can redirect the diner.
pub async fn check_canteen_binding(
    pool: &SqlitePool,
    enforce: bool,
    res: &Reservation,
    operator_canteen_id: Option<i64>,
) -> AppResult<()> {
    if !enforce {
        return Ok(());
    }
    let Some(op_canteen) = operator_canteen_id else {
        return Ok(());
    };
    let Some(bound) = res.canteen_id else {
        return Ok(());
    };
    if bound == op_canteen {
        return Ok(());
    }
    let name = canteen::find_by_id(pool, bound)
        .await?
        .map(|c| c.name)
        .unwrap_or_else(|| format!("canteen {bound}"));
    Err(AppError::canteen_mismatch(name))
}
