//! Diner Repository

use super::RepoResult;
use shared::models::{Diner, DinerCreate};
use sqlx::SqlitePool;

const DINER_SELECT: &str = "SELECT id, badge_no, national_id, display_name, is_active, created_at, updated_at FROM diner";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Diner>> {
    let sql = format!("{} WHERE id = ?", DINER_SELECT);
    let row = sqlx::query_as::<_, Diner>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_badge_no(pool: &SqlitePool, badge_no: &str) -> RepoResult<Option<Diner>> {
    let sql = format!("{} WHERE is_active = 1 AND badge_no = ?", DINER_SELECT);
    let row = sqlx::query_as::<_, Diner>(&sql)
        .bind(badge_no)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_national_id(pool: &SqlitePool, national_id: &str) -> RepoResult<Option<Diner>> {
    let sql = format!("{} WHERE is_active = 1 AND national_id = ?", DINER_SELECT);
    let row = sqlx::query_as::<_, Diner>(&sql)
        .bind(national_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Case-insensitive name substring match; deterministic first hit.
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<Diner>> {
    let pattern = format!("%{name}%");
    let sql = format!(
        "{} WHERE is_active = 1 AND display_name LIKE ? ORDER BY display_name, id LIMIT 1",
        DINER_SELECT
    );
    let row = sqlx::query_as::<_, Diner>(&sql)
        .bind(&pattern)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: DinerCreate) -> RepoResult<Diner> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO diner (id, badge_no, national_id, display_name, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, 1, ?5, ?5)",
    )
    .bind(id)
    .bind(&data.badge_no)
    .bind(&data.national_id)
    .bind(&data.display_name)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| super::RepoError::Database("Failed to create diner".into()))
}
