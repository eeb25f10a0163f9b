//! Canteen Repository

use super::{RepoError, RepoResult};
use shared::models::{Canteen, CanteenCreate};
use sqlx::SqlitePool;

const CANTEEN_SELECT: &str =
    "SELECT id, name, daily_capacity, is_active, created_at, updated_at FROM canteen";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Canteen>> {
    let sql = format!("{} WHERE id = ?", CANTEEN_SELECT);
    let row = sqlx::query_as::<_, Canteen>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CanteenCreate) -> RepoResult<Canteen> {
    if let Some(capacity) = data.daily_capacity
        && capacity <= 0
    {
        return Err(RepoError::Validation(format!(
            "daily_capacity must be positive: {capacity}"
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO canteen (id, name, daily_capacity, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, 1, ?4, ?4)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.daily_capacity)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create canteen".into()))
}
