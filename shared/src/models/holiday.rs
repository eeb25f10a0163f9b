//! Holiday Model

use serde::{Deserialize, Serialize};

/// Holiday record - a blackout date for ordering
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Holiday {
    pub id: i64,
    /// Blocked calendar date (YYYY-MM-DD)
    pub date: String,
    /// Shift scope; null applies the holiday to all shifts
    pub shift_id: Option<i64>,
    /// Display name ("Christmas Day", "Kitchen maintenance"...)
    pub name: String,
    pub is_active: bool,
    pub created_at: i64,
}

/// Create holiday payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayCreate {
    /// Blocked calendar date (YYYY-MM-DD)
    pub date: String,
    pub shift_id: Option<i64>,
    pub name: String,
}
