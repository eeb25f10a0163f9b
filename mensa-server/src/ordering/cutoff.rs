//! Cutoff Policy Resolver
//!
//! Pure decision functions: given the resolved [`CutoffPolicy`], a target
//! order date and a captured `now`, decide whether the date is still open.
//! The same formula gates creation and cancellation — too late to cancel
//! means too late to have ordered.
//!
//! Nothing here touches the clock or the configuration store; both arrive
//! as explicit arguments.

use chrono::{Datelike, Duration, NaiveDate, NaiveTime};
use chrono_tz::Tz;

use crate::utils::{AppError, AppResult, ErrorCode, time};
use shared::models::CutoffPolicy;

const DAY_MS: i64 = 86_400_000;
const HOUR_MS: i64 = 3_600_000;

/// Why a date was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CutoffRefusal {
    /// Order date lies before today (local calendar comparison)
    PastDate,
    /// Order date is beyond the configured ordering horizon
    TooFarAhead,
    /// The cutoff instant has passed
    CutoffPassed,
    /// WEEKLY mode: the weekday is excluded regardless of time
    WeekdayNotOrderable,
}

/// Resolver output; `cutoff_at` carries the computed boundary instant
/// (Unix millis) for client display whenever it is computable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutoffDecision {
    pub allowed: bool,
    pub refusal: Option<CutoffRefusal>,
    pub cutoff_at: Option<i64>,
}

impl CutoffDecision {
    fn allow(cutoff_at: Option<i64>) -> Self {
        Self {
            allowed: true,
            refusal: None,
            cutoff_at,
        }
    }

    fn refuse(refusal: CutoffRefusal, cutoff_at: Option<i64>) -> Self {
        Self {
            allowed: false,
            refusal: Some(refusal),
            cutoff_at,
        }
    }

    /// Map a refusal onto the admission error taxonomy.
    pub fn into_result(self) -> AppResult<()> {
        match self.refusal {
            None => Ok(()),
            Some(CutoffRefusal::PastDate) => {
                Err(AppError::validation("Order date is in the past"))
            }
            Some(CutoffRefusal::TooFarAhead) => Err(AppError::with_message(
                ErrorCode::OrderCutoffPassed,
                "Order date is beyond the ordering horizon",
            )),
            Some(CutoffRefusal::WeekdayNotOrderable) => {
                Err(AppError::new(ErrorCode::WeekdayNotOrderable))
            }
            Some(CutoffRefusal::CutoffPassed) => Err(match self.cutoff_at {
                Some(at) => AppError::cutoff_passed(at),
                None => AppError::new(ErrorCode::OrderCutoffPassed),
            }),
        }
    }
}

/// Evaluate the active cutoff policy for `order_date`.
///
/// `shift_start` is the shift's start time-of-day; only PER_SHIFT uses it.
pub fn evaluate(
    policy: &CutoffPolicy,
    order_date: NaiveDate,
    shift_start: NaiveTime,
    tz: Tz,
    now_millis: i64,
) -> CutoffDecision {
    match policy {
        CutoffPolicy::PerShift {
            cutoff_days,
            cutoff_hours,
            max_order_days_ahead,
        } => {
            let today = time::local_date(now_millis, tz);
            let shift_start_millis = time::date_time_millis(order_date, shift_start, tz);
            let cutoff_at = shift_start_millis - cutoff_days * DAY_MS - cutoff_hours * HOUR_MS;

            if order_date < today {
                CutoffDecision::refuse(CutoffRefusal::PastDate, Some(cutoff_at))
            } else if order_date > today + Duration::days(*max_order_days_ahead) {
                CutoffDecision::refuse(CutoffRefusal::TooFarAhead, Some(cutoff_at))
            } else if now_millis >= cutoff_at {
                CutoffDecision::refuse(CutoffRefusal::CutoffPassed, Some(cutoff_at))
            } else {
                CutoffDecision::allow(Some(cutoff_at))
            }
        }
        CutoffPolicy::Weekly {
            cutoff_day,
            cutoff_hour,
            cutoff_minute,
            orderable_days,
            max_weeks_ahead,
        } => {
            // Weekday exclusion applies regardless of time
            if !orderable_days.contains(&order_date.weekday()) {
                return CutoffDecision::refuse(CutoffRefusal::WeekdayNotOrderable, None);
            }

            let today = time::local_date(now_millis, tz);
            let target_week = time::week_start(order_date);
            let current_week = time::week_start(today);

            // Anchor: the most recent occurrence of the configured
            // weekday/time at or before the target week's Monday 00:00.
            let anchor_time = NaiveTime::from_hms_opt(*cutoff_hour, *cutoff_minute, 0)
                .unwrap_or(NaiveTime::MIN);
            let mut anchor_date =
                target_week + Duration::days(cutoff_day.num_days_from_monday() as i64);
            if anchor_date != target_week || anchor_time != NaiveTime::MIN {
                anchor_date = anchor_date - Duration::days(7);
            }
            let cutoff_at = time::date_time_millis(anchor_date, anchor_time, tz);

            if order_date < today {
                return CutoffDecision::refuse(CutoffRefusal::PastDate, Some(cutoff_at));
            }
            let weeks_ahead = (target_week - current_week).num_days() / 7;
            if weeks_ahead > *max_weeks_ahead {
                return CutoffDecision::refuse(CutoffRefusal::TooFarAhead, Some(cutoff_at));
            }
            if now_millis >= cutoff_at {
                return CutoffDecision::refuse(CutoffRefusal::CutoffPassed, Some(cutoff_at));
            }
            CutoffDecision::allow(Some(cutoff_at))
        }
    }
}
