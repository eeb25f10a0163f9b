//! Reservation Model
//!
//! A reservation is a diner's claim on one meal for one shift on one date.
//! Status transitions are monotonic and one-way into a terminal state;
//! ORDERED is the only non-terminal state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reservation status
///
/// ORDERED is the initial state. PICKED_UP and CANCELLED are set by this
/// server; NO_SHOW is set only by the external stale-reservation sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    #[default]
    Ordered,
    PickedUp,
    Cancelled,
    NoShow,
}

impl ReservationStatus {
    /// Terminal states admit no further transition
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Ordered)
    }

    /// Whether a transition from `self` to `next` is legal
    pub fn can_transition_to(&self, next: Self) -> bool {
        matches!(self, Self::Ordered) && next.is_terminal()
    }

    /// Canonical wire representation (matches the stored TEXT value)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ordered => "ORDERED",
            Self::PickedUp => "PICKED_UP",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Reservation {
    pub id: i64,
    /// Owning diner
    pub diner_id: i64,
    /// Shift the meal belongs to
    pub shift_id: i64,
    /// Canteen the meal is bound to, if any
    pub canteen_id: Option<i64>,
    /// Calendar date of the meal (YYYY-MM-DD, business timezone)
    pub order_date: String,
    pub status: ReservationStatus,
    /// Opaque token generated at creation, immutable thereafter
    pub qr_token: String,
    /// Price snapshotted from the shift at creation, never re-derived
    pub meal_price: f64,
    /// Check-in instant (Unix millis), null until fulfilled
    pub check_in_time: Option<i64>,
    /// Operator who performed the check-in
    pub checked_in_by: Option<i64>,
    /// Stored photo reference from check-in, if any
    pub photo_ref: Option<String>,
    /// Actor who cancelled the reservation
    pub cancelled_by: Option<i64>,
    pub cancel_reason: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    /// Parsed view of `order_date`; `None` for a malformed stored value
    pub fn order_date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.order_date, "%Y-%m-%d").ok()
    }
}

/// Create reservation payload (repository-level)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub diner_id: i64,
    pub shift_id: i64,
    pub canteen_id: Option<i64>,
    /// Calendar date (YYYY-MM-DD)
    pub order_date: String,
    pub qr_token: String,
    pub meal_price: f64,
}
