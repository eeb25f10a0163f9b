//! Reservation Repository
//!
//! All status transitions are conditional UPDATEs guarded by
//! `status = 'ORDERED'`. A zero-rows-affected outcome means a concurrent
//! caller already moved the row into a terminal state; callers re-read and
//! fold that into a benign result.

use super::{RepoError, RepoResult};
use shared::models::{Reservation, ReservationCreate};
use sqlx::SqlitePool;

const RESERVATION_SELECT: &str = "SELECT id, diner_id, shift_id, canteen_id, order_date, status, qr_token, meal_price, check_in_time, checked_in_by, photo_ref, cancelled_by, cancel_reason, created_at, updated_at FROM reservation";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Reservation>> {
    let sql = format!("{} WHERE id = ?", RESERVATION_SELECT);
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_token(pool: &SqlitePool, qr_token: &str) -> RepoResult<Option<Reservation>> {
    let sql = format!("{} WHERE qr_token = ?", RESERVATION_SELECT);
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(qr_token)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The duplicate-check read: any reservation the (diner, date) invariant counts
pub async fn find_active_by_diner_date(
    pool: &SqlitePool,
    diner_id: i64,
    order_date: &str,
) -> RepoResult<Option<Reservation>> {
    let sql = format!(
        "{} WHERE diner_id = ? AND order_date = ? AND status != 'CANCELLED' LIMIT 1",
        RESERVATION_SELECT
    );
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(diner_id)
        .bind(order_date)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Check-in candidate read: still-open reservations only
pub async fn find_ordered_by_diner_date(
    pool: &SqlitePool,
    diner_id: i64,
    order_date: &str,
) -> RepoResult<Option<Reservation>> {
    let sql = format!(
        "{} WHERE diner_id = ? AND order_date = ? AND status = 'ORDERED' LIMIT 1",
        RESERVATION_SELECT
    );
    let row = sqlx::query_as::<_, Reservation>(&sql)
        .bind(diner_id)
        .bind(order_date)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_diner(
    pool: &SqlitePool,
    diner_id: i64,
    limit: i32,
    offset: i32,
) -> RepoResult<Vec<Reservation>> {
    let sql = format!(
        "{} WHERE diner_id = ? ORDER BY order_date DESC, created_at DESC LIMIT ? OFFSET ?",
        RESERVATION_SELECT
    );
    let rows = sqlx::query_as::<_, Reservation>(&sql)
        .bind(diner_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Capacity count for (canteen, shift, date), cancelled rows excluded
pub async fn count_active_for_canteen(
    pool: &SqlitePool,
    canteen_id: i64,
    shift_id: i64,
    order_date: &str,
) -> RepoResult<i64> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM reservation WHERE canteen_id = ? AND shift_id = ? AND order_date = ? AND status != 'CANCELLED'",
    )
    .bind(canteen_id)
    .bind(shift_id)
    .bind(order_date)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

/// Insert a new ORDERED reservation.
///
/// The partial unique index on (diner_id, order_date) is the concurrency
/// backstop for the pre-insert duplicate check; a violation surfaces as
/// `RepoError::Duplicate`.
pub async fn create(pool: &SqlitePool, data: ReservationCreate) -> RepoResult<Reservation> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO reservation (id, diner_id, shift_id, canteen_id, order_date, status, qr_token, meal_price, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 'ORDERED', ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(data.diner_id)
    .bind(data.shift_id)
    .bind(data.canteen_id)
    .bind(&data.order_date)
    .bind(&data.qr_token)
    .bind(data.meal_price)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reservation".into()))
}

/// Conditional transition ORDERED → PICKED_UP.
///
/// Returns the number of affected rows; 0 means a concurrent caller
/// already finalized the reservation.
pub async fn mark_picked_up(
    pool: &SqlitePool,
    id: i64,
    operator_id: i64,
    photo_ref: Option<&str>,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE reservation SET status = 'PICKED_UP', check_in_time = ?1, checked_in_by = ?2, photo_ref = ?3, updated_at = ?1 WHERE id = ?4 AND status = 'ORDERED'",
    )
    .bind(now)
    .bind(operator_id)
    .bind(photo_ref)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}

/// Conditional transition ORDERED → CANCELLED.
pub async fn cancel(
    pool: &SqlitePool,
    id: i64,
    actor_id: i64,
    reason: &str,
    now: i64,
) -> RepoResult<u64> {
    let rows = sqlx::query(
        "UPDATE reservation SET status = 'CANCELLED', cancelled_by = ?1, cancel_reason = ?2, updated_at = ?3 WHERE id = ?4 AND status = 'ORDERED'",
    )
    .bind(actor_id)
    .bind(reason)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(rows.rows_affected())
}
