//! Ordering Settings Repository
//!
//! Single-row configuration. Read fresh per request — the core never
//! caches it across requests.

use super::{RepoError, RepoResult};
use shared::models::OrderingSettings;
use sqlx::SqlitePool;

const SETTINGS_SELECT: &str = "SELECT id, cutoff_mode, cutoff_days, cutoff_hours, max_order_days_ahead, weekly_cutoff_day, weekly_cutoff_hour, weekly_cutoff_minute, orderable_days, max_weeks_ahead, enforce_canteen_checkin, checkin_grace_minutes, updated_at FROM ordering_settings WHERE id = 1";

pub async fn get(pool: &SqlitePool) -> RepoResult<OrderingSettings> {
    sqlx::query_as::<_, OrderingSettings>(SETTINGS_SELECT)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::NotFound("Ordering settings row is missing".into()))
}

pub async fn save(pool: &SqlitePool, data: &OrderingSettings) -> RepoResult<OrderingSettings> {
    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE ordering_settings SET cutoff_mode = ?1, cutoff_days = ?2, cutoff_hours = ?3, max_order_days_ahead = ?4, weekly_cutoff_day = ?5, weekly_cutoff_hour = ?6, weekly_cutoff_minute = ?7, orderable_days = ?8, max_weeks_ahead = ?9, enforce_canteen_checkin = ?10, checkin_grace_minutes = ?11, updated_at = ?12 WHERE id = 1",
    )
    .bind(&data.cutoff_mode)
    .bind(data.cutoff_days)
    .bind(data.cutoff_hours)
    .bind(data.max_order_days_ahead)
    .bind(data.weekly_cutoff_day)
    .bind(data.weekly_cutoff_hour)
    .bind(data.weekly_cutoff_minute)
    .bind(&data.orderable_days)
    .bind(data.max_weeks_ahead)
    .bind(data.enforce_canteen_checkin)
    .bind(data.checkin_grace_minutes)
    .bind(now)
    .execute(pool)
    .await?;
    get(pool).await
}
