//! Shift Repository
//!
//! Shifts are catalog data managed elsewhere; this server reads them and
//! only creates rows for tests and seeding.

use super::{RepoError, RepoResult};
use shared::models::{Shift, ShiftCreate};
use sqlx::SqlitePool;

const SHIFT_SELECT: &str =
    "SELECT id, name, start_time, end_time, meal_price, is_active, created_at, updated_at FROM shift";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Shift>> {
    let sql = format!("{} WHERE id = ?", SHIFT_SELECT);
    let row = sqlx::query_as::<_, Shift>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_active(pool: &SqlitePool) -> RepoResult<Vec<Shift>> {
    let sql = format!("{} WHERE is_active = 1 ORDER BY start_time", SHIFT_SELECT);
    let rows = sqlx::query_as::<_, Shift>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn create(pool: &SqlitePool, data: ShiftCreate) -> RepoResult<Shift> {
    if data.meal_price < 0.0 || !data.meal_price.is_finite() {
        return Err(RepoError::Validation(format!(
            "meal_price must be a non-negative number: {}",
            data.meal_price
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO shift (id, name, start_time, end_time, meal_price, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.start_time)
    .bind(&data.end_time)
    .bind(data.meal_price)
    .bind(data.is_active)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create shift".into()))
}
