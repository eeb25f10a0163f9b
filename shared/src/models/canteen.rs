//! Canteen Model

use serde::{Deserialize, Serialize};

/// Canteen record - a physical serving location
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Canteen {
    pub id: i64,
    pub name: String,
    /// Maximum non-cancelled reservations per (shift, date); null = unlimited
    pub daily_capacity: Option<i64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create canteen payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanteenCreate {
    pub name: String,
    pub daily_capacity: Option<i64>,
}
