use super::*;

use shared::models::ReservationStatus;

// Baseline scenario: today is Thursday 2025-03-06, lunch shift 12:00-14:00,
// default PER_SHIFT policy (cutoff 2h before start).

#[tokio::test]
async fn test_create_reservation_happy_path() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;

    let res = admit(
        &pool,
        &s,
        diner.id,
        shift.id,
        "2025-03-06",
        None,
        millis(2025, 3, 6, 8, 0),
    )
    .await
    .unwrap();

    assert_eq!(res.status, ReservationStatus::Ordered);
    assert_eq!(res.diner_id, diner.id);
    assert_eq!(res.order_date, "2025-03-06");
    // Price snapshotted from the shift at creation
    assert_eq!(res.meal_price, 4.5);
    // Opaque token: 32 random bytes, hex-encoded
    assert_eq!(res.qr_token.len(), 64);
    assert!(res.qr_token.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(res.check_in_time.is_none());
    assert!(res.cancelled_by.is_none());
}

#[tokio::test]
async fn test_duplicate_reservation_is_rejected() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let lunch = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let dinner = seed_shift(&pool, "dinner", "19:00", "21:00", 5.0).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;
    let now = millis(2025, 3, 6, 8, 0);

    admit(&pool, &s, diner.id, lunch.id, "2025-03-06", None, now)
        .await
        .unwrap();

    // Same date, even for a different shift: one meal per day
    let err = admit(&pool, &s, diner.id, dinner.id, "2025-03-06", None, now)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateReservation);

    // Another date is fine
    admit(&pool, &s, diner.id, lunch.id, "2025-03-07", None, now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_cancelled_reservation_frees_the_date() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;
    let now = millis(2025, 3, 6, 8, 0);

    let res = admit(&pool, &s, diner.id, shift.id, "2025-03-06", None, now)
        .await
        .unwrap();
    let ctx = CancelContext {
        actor_id: diner.id,
        actor_role: Role::Diner,
        reason: None,
    };
    cancel_reservation(&pool, &s, TZ, res.id, &ctx, now)
        .await
        .unwrap();

    // A cancelled row no longer occupies the (diner, date) slot
    admit(&pool, &s, diner.id, shift.id, "2025-03-06", None, now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_concurrent_creates_yield_single_row() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;
    let now = millis(2025, 3, 6, 8, 0);

    let (a, b) = tokio::join!(
        admit(&pool, &s, diner.id, shift.id, "2025-03-06", None, now),
        admit(&pool, &s, diner.id, shift.id, "2025-03-06", None, now),
    );

    // Exactly one create wins; the loser gets DuplicateReservation from
    // either the pre-check or the partial unique index.
    let outcomes = [a, b];
    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    let err = outcomes.into_iter().find_map(Result::err).unwrap();
    assert_eq!(err.code, ErrorCode::DuplicateReservation);
}

#[tokio::test]
async fn test_past_date_is_rejected() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;

    let err = admit(
        &pool,
        &s,
        diner.id,
        shift.id,
        "2025-03-05",
        None,
        millis(2025, 3, 6, 8, 0),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
}

#[tokio::test]
async fn test_cutoff_rejection_carries_boundary() {
    let (pool, _dir) = setup_pool().await;
    let s = per_shift_settings(&pool, 0, 6).await;
    let shift = seed_shift(&pool, "breakfast", "08:00", "10:00", 3.0).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;

    // Cutoff is 02:00; at 02:01 the order is refused
    let err = admit(
        &pool,
        &s,
        diner.id,
        shift.id,
        "2025-03-06",
        None,
        millis(2025, 3, 6, 2, 1),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderCutoffPassed);
    assert_eq!(
        err.details.unwrap().get("cutoff_at").unwrap(),
        millis(2025, 3, 6, 2, 0)
    );

    // At 01:59 it goes through
    admit(
        &pool,
        &s,
        diner.id,
        shift.id,
        "2025-03-06",
        None,
        millis(2025, 3, 6, 1, 59),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_blanket_holiday_blocks_all_shifts() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;

    holiday::create(
        &pool,
        HolidayCreate {
            date: "2025-03-06".into(),
            shift_id: None,
            name: "Kitchen maintenance".into(),
        },
    )
    .await
    .unwrap();

    let err = admit(
        &pool,
        &s,
        diner.id,
        shift.id,
        "2025-03-06",
        None,
        millis(2025, 3, 6, 8, 0),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::HolidayNotOrderable);
    assert!(err.message.contains("no meals are served"));
}

#[tokio::test]
async fn test_shift_scoped_holiday_blocks_only_that_shift() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let lunch = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let dinner = seed_shift(&pool, "dinner", "19:00", "21:00", 5.0).await;
    let ana = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;
    let bo = seed_diner(&pool, Some("1002"), None, "Bo Lindgren").await;
    let now = millis(2025, 3, 6, 8, 0);

    holiday::create(
        &pool,
        HolidayCreate {
            date: "2025-03-06".into(),
            shift_id: Some(lunch.id),
            name: "Lunch suspended".into(),
        },
    )
    .await
    .unwrap();

    let err = admit(&pool, &s, ana.id, lunch.id, "2025-03-06", None, now)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::HolidayNotOrderable);
    assert!(err.message.contains("this shift"));

    // The other shift on the same date stays orderable
    admit(&pool, &s, bo.id, dinner.id, "2025-03-06", None, now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_inactive_or_missing_shift() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;
    let now = millis(2025, 3, 6, 8, 0);

    let inactive = shift::create(
        &pool,
        ShiftCreate {
            name: "retired".into(),
            start_time: "12:00".into(),
            end_time: "14:00".into(),
            meal_price: 4.5,
            is_active: false,
        },
    )
    .await
    .unwrap();

    let err = admit(&pool, &s, diner.id, inactive.id, "2025-03-06", None, now)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ShiftInactive);

    let err = admit(&pool, &s, diner.id, 999_999, "2025-03-06", None, now)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ShiftNotFound);
}

#[tokio::test]
async fn test_canteen_capacity_guard() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let canteen = seed_canteen(&pool, "North Hall", Some(2)).await;
    let now = millis(2025, 3, 6, 8, 0);

    for badge in ["1001", "1002"] {
        let d = seed_diner(&pool, Some(badge), None, badge).await;
        admit(&pool, &s, d.id, shift.id, "2025-03-06", Some(canteen.id), now)
            .await
            .unwrap();
    }

    let third = seed_diner(&pool, Some("1003"), None, "Cai Wen").await;
    let err = admit(&pool, &s, third.id, shift.id, "2025-03-06", Some(canteen.id), now)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::CanteenCapacityFull);
    assert_eq!(err.details.unwrap().get("canteen").unwrap(), "North Hall");

    // Another date has its own budget
    admit(&pool, &s, third.id, shift.id, "2025-03-07", Some(canteen.id), now)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_canteen_without_capacity_is_unlimited() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let canteen = seed_canteen(&pool, "South Hall", None).await;
    let now = millis(2025, 3, 6, 8, 0);

    for badge in ["1001", "1002", "1003", "1004"] {
        let d = seed_diner(&pool, Some(badge), None, badge).await;
        admit(&pool, &s, d.id, shift.id, "2025-03-06", Some(canteen.id), now)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn test_unknown_canteen_is_rejected() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;

    let err = admit(
        &pool,
        &s,
        diner.id,
        shift.id,
        "2025-03-06",
        Some(999_999),
        millis(2025, 3, 6, 8, 0),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::CanteenNotFound);
}

#[tokio::test]
async fn test_weekly_mode_excluded_weekday_end_to_end() {
    let (pool, _dir) = setup_pool().await;
    let s = weekly_settings(&pool, "0,1,2,3,4").await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;

    // 2025-03-08 is a Saturday; refused regardless of how early we order
    let err = admit(
        &pool,
        &s,
        diner.id,
        shift.id,
        "2025-03-08",
        None,
        millis(2025, 3, 6, 0, 1),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::WeekdayNotOrderable);
}
