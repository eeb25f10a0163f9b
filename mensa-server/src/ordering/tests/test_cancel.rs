use super::*;

use shared::models::ReservationStatus;

async fn seed_reservation(pool: &SqlitePool) -> (OrderingSettings, Reservation) {
    let s = current_settings(pool).await;
    let shift = seed_shift(pool, "lunch", "12:00", "14:00", 4.5).await;
    let diner = seed_diner(pool, Some("1001"), None, "Ana Costa").await;
    // Lunch tomorrow, ordered well before the cutoff
    let res = admit(pool, &s, diner.id, shift.id, "2025-03-07", None, millis(2025, 3, 6, 8, 0))
        .await
        .unwrap();
    (s, res)
}

fn diner_ctx(actor_id: i64) -> CancelContext {
    CancelContext {
        actor_id,
        actor_role: Role::Diner,
        reason: None,
    }
}

#[tokio::test]
async fn test_cancel_before_cutoff_succeeds() {
    let (pool, _dir) = setup_pool().await;
    let (s, res) = seed_reservation(&pool).await;
    let now = millis(2025, 3, 6, 9, 0);

    let cancelled = cancel_reservation(&pool, &s, TZ, res.id, &diner_ctx(res.diner_id), now)
        .await
        .unwrap();

    assert_eq!(cancelled.status, ReservationStatus::Cancelled);
    assert_eq!(cancelled.cancelled_by, Some(res.diner_id));
    // Reason defaulted from the actor's role
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("Cancelled by diner"));
}

#[tokio::test]
async fn test_cancel_records_custom_reason_and_staff_default() {
    let (pool, _dir) = setup_pool().await;
    let (s, res) = seed_reservation(&pool).await;
    let now = millis(2025, 3, 6, 9, 0);

    let ctx = CancelContext {
        actor_id: 900,
        actor_role: Role::Operator,
        reason: Some("Diner called in sick".to_string()),
    };
    let cancelled = cancel_reservation(&pool, &s, TZ, res.id, &ctx, now)
        .await
        .unwrap();
    assert_eq!(cancelled.cancelled_by, Some(900));
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("Diner called in sick"));
}

#[tokio::test]
async fn test_staff_default_reason() {
    let (pool, _dir) = setup_pool().await;
    let (s, res) = seed_reservation(&pool).await;
    let ctx = CancelContext {
        actor_id: 900,
        actor_role: Role::Admin,
        reason: None,
    };
    let cancelled = cancel_reservation(&pool, &s, TZ, res.id, &ctx, millis(2025, 3, 6, 9, 0))
        .await
        .unwrap();
    assert_eq!(cancelled.cancel_reason.as_deref(), Some("Cancelled by staff"));
}

#[tokio::test]
async fn test_repeated_cancel_is_already_final() {
    let (pool, _dir) = setup_pool().await;
    let (s, res) = seed_reservation(&pool).await;
    let now = millis(2025, 3, 6, 9, 0);

    cancel_reservation(&pool, &s, TZ, res.id, &diner_ctx(res.diner_id), now)
        .await
        .unwrap();

    let err = cancel_reservation(&pool, &s, TZ, res.id, &diner_ctx(res.diner_id), now)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationAlreadyFinal);
    assert_eq!(err.details.unwrap().get("status").unwrap(), "CANCELLED");
}

#[tokio::test]
async fn test_cancel_after_cutoff_fails() {
    let (pool, _dir) = setup_pool().await;
    let (s, res) = seed_reservation(&pool).await;

    // Cutoff for tomorrow's 12:00 lunch is 10:00; cancelling at 11:00
    // the next day is too late
    let err = cancel_reservation(
        &pool,
        &s,
        TZ,
        res.id,
        &diner_ctx(res.diner_id),
        millis(2025, 3, 7, 11, 0),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::OrderCutoffPassed);
    assert_eq!(
        err.details.unwrap().get("cutoff_at").unwrap(),
        millis(2025, 3, 7, 10, 0)
    );

    // The reservation is untouched
    let current = reservation::find_by_id(&pool, res.id).await.unwrap().unwrap();
    assert_eq!(current.status, ReservationStatus::Ordered);
}

#[tokio::test]
async fn test_cancel_picked_up_always_fails() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;
    let shift = seed_shift(&pool, "lunch", "12:00", "14:00", 4.5).await;
    let diner = seed_diner(&pool, Some("1001"), None, "Ana Costa").await;
    let res = admit(&pool, &s, diner.id, shift.id, "2025-03-06", None, millis(2025, 3, 6, 8, 0))
        .await
        .unwrap();

    check_in_by_token(&pool, &s, TZ, &res.qr_token, &operator_ctx(500), millis(2025, 3, 6, 12, 30))
        .await
        .unwrap();

    let err = cancel_reservation(
        &pool,
        &s,
        TZ,
        res.id,
        &diner_ctx(diner.id),
        millis(2025, 3, 6, 12, 45),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationAlreadyFinal);
    assert_eq!(err.details.unwrap().get("status").unwrap(), "PICKED_UP");
}

#[tokio::test]
async fn test_diner_cannot_cancel_another_diners_reservation() {
    let (pool, _dir) = setup_pool().await;
    let (s, res) = seed_reservation(&pool).await;

    let err = cancel_reservation(
        &pool,
        &s,
        TZ,
        res.id,
        &diner_ctx(res.diner_id + 1),
        millis(2025, 3, 6, 9, 0),
    )
    .await
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
}

#[tokio::test]
async fn test_cancel_unknown_reservation() {
    let (pool, _dir) = setup_pool().await;
    let s = current_settings(&pool).await;

    let err = cancel_reservation(&pool, &s, TZ, 424242, &diner_ctx(1), millis(2025, 3, 6, 9, 0))
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ReservationNotFound);
}
