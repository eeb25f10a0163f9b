//! Service-window validation for check-in
//!
//! A reservation may only be redeemed inside its shift's active service
//! window. For a day shift the window is the reservation's calendar day;
//! an overnight shift additionally spills into the following morning until
//! its end time (plus the configured grace tolerance).
//!
//! The whole check derives from the single `now` captured at request entry.

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::utils::{AppError, AppResult, time};
use shared::models::Shift;

const MINUTE_MS: i64 = 60_000;

/// Window decision; `window_end` is included when the boundary is
/// computable, for client display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowDecision {
    Valid,
    Closed { window_end: Option<i64> },
}

impl WindowDecision {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn into_result(self, order_date: &str) -> AppResult<()> {
        match self {
            Self::Valid => Ok(()),
            Self::Closed { window_end } => Err(AppError::window_closed(order_date, window_end)),
        }
    }
}

/// Validate that `now` falls inside the service window of a reservation
/// dated `order_date` for `shift`.
pub fn validate(
    shift: &Shift,
    order_date: NaiveDate,
    tz: Tz,
    grace_minutes: i64,
    now_millis: i64,
) -> WindowDecision {
    let today = time::local_date(now_millis, tz);

    // Same-day reservations are redeemable the whole calendar day.
    if order_date == today {
        return WindowDecision::Valid;
    }

    // Overnight spill-over: yesterday's reservation stays valid until the
    // shift's end time rolled into today, plus the grace tolerance.
    if shift.is_overnight()
        && today.pred_opt() == Some(order_date)
        && let Some(end) = shift.end()
    {
        let window_end = time::date_time_millis(today, end, tz) + grace_minutes * MINUTE_MS;
        if now_millis < window_end {
            return WindowDecision::Valid;
        }
        return WindowDecision::Closed {
            window_end: Some(window_end),
        };
    }

    // Anything else is stale (or not yet due); report the day boundary
    // for past dates.
    let window_end = (order_date < today).then(|| time::day_end_millis(order_date, tz));
    WindowDecision::Closed { window_end }
}
