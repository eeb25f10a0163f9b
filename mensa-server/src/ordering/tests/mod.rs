use super::*;

use chrono::{NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use sqlx::SqlitePool;

use crate::auth::Role;
use crate::db::DbService;
use crate::db::repository::{canteen, diner, holiday, reservation, settings, shift};
use shared::error::ErrorCode;
use shared::models::{
    Canteen, CanteenCreate, Diner, DinerCreate, HolidayCreate, OrderingSettings, Reservation,
    Shift, ShiftCreate,
};

mod test_admission;
mod test_cancel;

const TZ: Tz = chrono_tz::UTC;

/// Temp-file-backed pool with the real migrations applied.
///
/// The TempDir must stay alive for the duration of the test.
async fn setup_pool() -> (SqlitePool, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    let service = DbService::new(&db_path.to_string_lossy())
        .await
        .expect("Failed to open test database");
    (service.pool, dir)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn millis(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> i64 {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
        .timestamp_millis()
}

async fn seed_shift(pool: &SqlitePool, name: &str, start: &str, end: &str, price: f64) -> Shift {
    shift::create(
        pool,
        ShiftCreate {
            name: name.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            meal_price: price,
            is_active: true,
        },
    )
    .await
    .unwrap()
}

async fn seed_diner(
    pool: &SqlitePool,
    badge_no: Option<&str>,
    national_id: Option<&str>,
    name: &str,
) -> Diner {
    diner::create(
        pool,
        DinerCreate {
            badge_no: badge_no.map(str::to_string),
            national_id: national_id.map(str::to_string),
            display_name: name.to_string(),
        },
    )
    .await
    .unwrap()
}

async fn seed_canteen(pool: &SqlitePool, name: &str, capacity: Option<i64>) -> Canteen {
    canteen::create(
        pool,
        CanteenCreate {
            name: name.to_string(),
            daily_capacity: capacity,
        },
    )
    .await
    .unwrap()
}

/// Default settings from the migration: PER_SHIFT, cutoff 2h before start.
async fn current_settings(pool: &SqlitePool) -> OrderingSettings {
    settings::get(pool).await.unwrap()
}

async fn per_shift_settings(pool: &SqlitePool, cutoff_days: i64, cutoff_hours: i64) -> OrderingSettings {
    let mut s = current_settings(pool).await;
    s.cutoff_mode = "PER_SHIFT".to_string();
    s.cutoff_days = cutoff_days;
    s.cutoff_hours = cutoff_hours;
    settings::save(pool, &s).await.unwrap()
}

async fn weekly_settings(pool: &SqlitePool, orderable_days: &str) -> OrderingSettings {
    let mut s = current_settings(pool).await;
    s.cutoff_mode = "WEEKLY".to_string();
    s.orderable_days = orderable_days.to_string();
    settings::save(pool, &s).await.unwrap()
}

async fn admit(
    pool: &SqlitePool,
    s: &OrderingSettings,
    diner_id: i64,
    shift_id: i64,
    order_date: &str,
    canteen_id: Option<i64>,
    now: i64,
) -> shared::error::AppResult<Reservation> {
    create_reservation(
        pool,
        s,
        TZ,
        diner_id,
        &AdmissionRequest {
            shift_id,
            order_date: order_date.to_string(),
            canteen_id,
        },
        now,
    )
    .await
}

fn operator_ctx(operator_id: i64) -> CheckinContext {
    CheckinContext {
        operator_id,
        canteen_id: None,
        photo_ref: None,
    }
}
