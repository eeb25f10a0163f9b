//! Holiday Repository

use super::{RepoError, RepoResult};
use shared::models::{Holiday, HolidayCreate};
use sqlx::SqlitePool;

const HOLIDAY_SELECT: &str =
    "SELECT id, date, shift_id, name, is_active, created_at FROM holiday";

/// Find an active holiday blocking `date` for `shift_id`.
///
/// A shift-specific holiday wins over a blanket one so the rejection
/// message can name the scope precisely.
pub async fn find_active_for(
    pool: &SqlitePool,
    date: &str,
    shift_id: i64,
) -> RepoResult<Option<Holiday>> {
    let sql = format!(
        "{} WHERE is_active = 1 AND date = ?1 AND (shift_id IS NULL OR shift_id = ?2) ORDER BY shift_id IS NULL LIMIT 1",
        HOLIDAY_SELECT
    );
    let row = sqlx::query_as::<_, Holiday>(&sql)
        .bind(date)
        .bind(shift_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: HolidayCreate) -> RepoResult<Holiday> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO holiday (id, date, shift_id, name, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 1, ?5)",
    )
    .bind(id)
    .bind(&data.date)
    .bind(data.shift_id)
    .bind(&data.name)
    .bind(now)
    .execute(pool)
    .await?;

    let sql = format!("{} WHERE id = ?", HOLIDAY_SELECT);
    sqlx::query_as::<_, Holiday>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create holiday".into()))
}
