//! Diner Model

use serde::{Deserialize, Serialize};

/// Diner record - the user a reservation belongs to
///
/// Managed by an external directory; this server only reads it for
/// manual check-in lookup (badge number, national id, name).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Diner {
    pub id: i64,
    /// External badge/employee number
    pub badge_no: Option<String>,
    /// National identity document number
    pub national_id: Option<String>,
    pub display_name: String,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create diner payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DinerCreate {
    pub badge_no: Option<String>,
    pub national_id: Option<String>,
    pub display_name: String,
}
