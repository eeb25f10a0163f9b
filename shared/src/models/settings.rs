//! Ordering Settings Model
//!
//! Process-wide ordering configuration, stored as a single row and read
//! fresh per request. Decision functions never read it implicitly; the
//! resolved [`CutoffPolicy`] value is passed into every call.

use crate::error::{AppError, AppResult, ErrorCode};
use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Cutoff mode stored value for PER_SHIFT
pub const CUTOFF_MODE_PER_SHIFT: &str = "PER_SHIFT";
/// Cutoff mode stored value for WEEKLY
pub const CUTOFF_MODE_WEEKLY: &str = "WEEKLY";

/// Ordering settings row
///
/// Exactly one cutoff mode is active at a time; the inactive mode's
/// columns are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OrderingSettings {
    pub id: i64,
    /// PER_SHIFT | WEEKLY
    pub cutoff_mode: String,
    /// PER_SHIFT: day component of the offset before shift start
    pub cutoff_days: i64,
    /// PER_SHIFT: hour component of the offset before shift start
    pub cutoff_hours: i64,
    /// PER_SHIFT: how many days ahead of today a reservation may target
    pub max_order_days_ahead: i64,
    /// WEEKLY: anchor weekday, 0 = Monday .. 6 = Sunday
    pub weekly_cutoff_day: i64,
    /// WEEKLY: anchor hour of day
    pub weekly_cutoff_hour: i64,
    /// WEEKLY: anchor minute
    pub weekly_cutoff_minute: i64,
    /// WEEKLY: comma-separated orderable weekdays (0 = Monday .. 6 = Sunday)
    pub orderable_days: String,
    /// WEEKLY: how many weeks ahead of the current week may be ordered
    pub max_weeks_ahead: i64,
    /// Whether check-ins must happen at the reservation's canteen
    pub enforce_canteen_checkin: bool,
    /// Tolerance after shift end for the overnight spill-over window
    pub checkin_grace_minutes: i64,
    pub updated_at: i64,
}

/// Resolved cutoff policy - the tagged union handed to the resolver
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CutoffPolicy {
    /// Cutoff is an offset before each shift's start instant
    PerShift {
        cutoff_days: i64,
        cutoff_hours: i64,
        max_order_days_ahead: i64,
    },
    /// Cutoff is a weekly anchor closing the whole following week
    Weekly {
        cutoff_day: Weekday,
        cutoff_hour: u32,
        cutoff_minute: u32,
        orderable_days: Vec<Weekday>,
        max_weeks_ahead: i64,
    },
}

fn weekday_from_index(n: i64) -> AppResult<Weekday> {
    Ok(match n {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        6 => Weekday::Sun,
        _ => {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                format!("Invalid weekday index in settings: {n}"),
            ));
        }
    })
}

impl OrderingSettings {
    /// Resolve the stored row into the active cutoff policy.
    ///
    /// A corrupt row (unknown mode, out-of-range weekday, unparseable
    /// orderable_days) is a configuration error, not a business rejection.
    pub fn cutoff_policy(&self) -> AppResult<CutoffPolicy> {
        match self.cutoff_mode.as_str() {
            CUTOFF_MODE_PER_SHIFT => Ok(CutoffPolicy::PerShift {
                cutoff_days: self.cutoff_days,
                cutoff_hours: self.cutoff_hours,
                max_order_days_ahead: self.max_order_days_ahead,
            }),
            CUTOFF_MODE_WEEKLY => {
                if !(0..24).contains(&self.weekly_cutoff_hour)
                    || !(0..60).contains(&self.weekly_cutoff_minute)
                {
                    return Err(AppError::with_message(
                        ErrorCode::ConfigError,
                        format!(
                            "Invalid weekly cutoff time in settings: {:02}:{:02}",
                            self.weekly_cutoff_hour, self.weekly_cutoff_minute
                        ),
                    ));
                }
                let mut orderable_days = Vec::new();
                for part in self.orderable_days.split(',') {
                    let part = part.trim();
                    if part.is_empty() {
                        continue;
                    }
                    let n: i64 = part.parse().map_err(|_| {
                        AppError::with_message(
                            ErrorCode::ConfigError,
                            format!("Invalid orderable_days entry: {part}"),
                        )
                    })?;
                    orderable_days.push(weekday_from_index(n)?);
                }
                Ok(CutoffPolicy::Weekly {
                    cutoff_day: weekday_from_index(self.weekly_cutoff_day)?,
                    cutoff_hour: self.weekly_cutoff_hour as u32,
                    cutoff_minute: self.weekly_cutoff_minute as u32,
                    orderable_days,
                    max_weeks_ahead: self.max_weeks_ahead,
                })
            }
            other => Err(AppError::with_message(
                ErrorCode::ConfigError,
                format!("Unknown cutoff mode: {other}"),
            )),
        }
    }
}
