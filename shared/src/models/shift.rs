//! Shift Model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Shift record - a time-boxed meal service (breakfast, lunch, night shift...)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Shift {
    pub id: i64,
    /// Display name
    pub name: String,
    /// Service start time-of-day (HH:MM)
    pub start_time: String,
    /// Service end time-of-day (HH:MM); earlier than start_time for
    /// shifts that wrap past midnight
    pub end_time: String,
    /// Price snapshotted onto reservations at creation
    pub meal_price: f64,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Shift {
    /// Parsed start time-of-day; `None` for a malformed stored value
    pub fn start(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.start_time, "%H:%M").ok()
    }

    /// Parsed end time-of-day; `None` for a malformed stored value
    pub fn end(&self) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(&self.end_time, "%H:%M").ok()
    }

    /// Overnight predicate: end-of-day earlier than start-of-day means the
    /// service window ends on the calendar day after the order date.
    pub fn is_overnight(&self) -> bool {
        match (self.start(), self.end()) {
            (Some(start), Some(end)) => end < start,
            _ => false,
        }
    }
}

/// Create shift payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiftCreate {
    pub name: String,
    /// Service start time-of-day (HH:MM)
    pub start_time: String,
    /// Service end time-of-day (HH:MM)
    pub end_time: String,
    pub meal_price: f64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
