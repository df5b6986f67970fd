mod common;

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::json;

use common::{booking_json, range_json, user_session, vehicle_json, MockBackend, MockData};
use rental_storefront::client::{HttpRentalApi, RentalApi};
use rental_storefront::models::{BookingStatus, Session};
use rental_storefront::services::{
    build_intent, AvailabilityCalculator, BookingService, CatalogService,
    PaymentSessionInitiator, ReconciliationPoller, ReconciliationStatus, SessionOutcome,
};
use rental_storefront::ClientError;

fn api(backend: &MockBackend) -> Arc<dyn RentalApi> {
    Arc::new(HttpRentalApi::new(&backend.config()).unwrap())
}

fn at(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn poller(backend: &MockBackend, session: Session, session_id: Option<&str>) -> ReconciliationPoller {
    ReconciliationPoller::new(
        api(backend),
        session,
        session_id.map(str::to_string),
        &backend.config(),
    )
}

#[tokio::test]
async fn test_conflict_refreshes_availability() {
    let backend = MockBackend::start_with(MockData {
        vehicles: vec![vehicle_json("v1", "100")],
        booked_dates_after_conflict: Some(vec![range_json(
            "2030-06-01T00:00:00Z",
            "2030-06-03T00:00:00Z",
        )]),
        create_session_status: Some(409),
        create_session_body: Some(json!({ "message": "Vehicle already booked for these dates" })),
        ..MockData::default()
    })
    .await;
    let api = api(&backend);
    let session = user_session();

    let (vehicle, mut availability) = CatalogService::new(api.clone())
        .vehicle_with_availability("v1")
        .await
        .unwrap();
    assert!(availability.ranges().is_empty());

    let intent = build_intent(
        &vehicle.id,
        Some(at("2030-06-02T10:00:00Z")),
        Some(at("2030-06-04T10:00:00Z")),
        vehicle.price_per_day,
        Some(&session),
    )
    .unwrap();
    assert_eq!(intent.price_estimate, Decimal::from(200));

    let outcome = PaymentSessionInitiator::new(api)
        .initiate(&intent, &session, &mut availability)
        .await;
    assert_eq!(
        outcome,
        SessionOutcome::Conflict {
            message: "Vehicle already booked for these dates".to_string()
        }
    );
    assert_eq!(outcome.notice().title, "Already Booked");

    assert_eq!(backend.data().booked_dates_calls, 2);
    for d in 1..=3 {
        assert!(availability.is_day_unavailable(day(2030, 6, d)));
    }
    assert!(!availability.is_day_unavailable(day(2030, 6, 4)));
    assert!(!availability.is_range_available(intent.start_date, intent.end_date));
}

#[tokio::test]
async fn test_successful_session_redirects_and_can_be_reinitiated() {
    let backend = MockBackend::start().await;
    let session = user_session();
    let initiator = PaymentSessionInitiator::new(api(&backend));
    let mut availability = AvailabilityCalculator::new("v1");

    let intent = build_intent(
        "v1",
        Some(at("2030-07-01T00:00:00Z")),
        Some(at("2030-07-02T01:00:00Z")),
        Decimal::from(100),
        Some(&session),
    )
    .unwrap();

    let first = initiator.initiate(&intent, &session, &mut availability).await;
    let SessionOutcome::Redirect(target) = &first else {
        panic!("expected redirect, got {:?}", first);
    };
    assert_eq!(target.url, "https://checkout.example/pay/cs_test_1");
    assert_eq!(target.session_id.as_deref(), Some("cs_test_1"));

    let second = initiator.initiate(&intent, &session, &mut availability).await;
    assert!(second.redirect_url().is_some());

    let data = backend.data();
    assert_eq!(data.create_session_calls, 2);
    assert_eq!(data.booked_dates_calls, 0);
    let request = data.last_session_request.clone().unwrap();
    assert_eq!(request["vehicleId"], "v1");
    assert!(request["startDate"].as_str().unwrap().starts_with("2030-07-01T00:00:00"));
    assert_eq!(data.last_authorization.as_deref(), Some(common::USER_TOKEN));
}

#[tokio::test]
async fn test_server_error_is_retryable_failure() {
    let backend = MockBackend::start_with(MockData {
        create_session_status: Some(500),
        create_session_body: Some(json!({ "message": "Stripe is down" })),
        ..MockData::default()
    })
    .await;
    let session = user_session();
    let mut availability = AvailabilityCalculator::new("v1");
    let intent = build_intent(
        "v1",
        Some(at("2030-07-01T00:00:00Z")),
        Some(at("2030-07-03T00:00:00Z")),
        Decimal::from(100),
        Some(&session),
    )
    .unwrap();

    let outcome = PaymentSessionInitiator::new(api(&backend))
        .initiate(&intent, &session, &mut availability)
        .await;
    match outcome {
        SessionOutcome::Failed { notice, retryable } => {
            assert!(retryable);
            assert_eq!(notice.title, "Payment Failed");
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(backend.data().booked_dates_calls, 0);
}

#[tokio::test]
async fn test_missing_checkout_url_is_a_failure() {
    let backend = MockBackend::start_with(MockData {
        create_session_body: Some(json!({ "message": "no url" })),
        ..MockData::default()
    })
    .await;
    let session = user_session();
    let mut availability = AvailabilityCalculator::new("v1");
    let intent = build_intent(
        "v1",
        Some(at("2030-07-01T00:00:00Z")),
        Some(at("2030-07-03T00:00:00Z")),
        Decimal::from(100),
        Some(&session),
    )
    .unwrap();

    let outcome = PaymentSessionInitiator::new(api(&backend))
        .initiate(&intent, &session, &mut availability)
        .await;
    assert!(matches!(outcome, SessionOutcome::Failed { retryable: false, .. }));
}

#[tokio::test]
async fn test_reconciliation_finds_booking_after_one_retry() {
    let backend = MockBackend::start_with(MockData {
        bookings: vec![booking_json("b1", "cs_test_9", "confirmed")],
        bookings_hidden_for: 1,
        ..MockData::default()
    })
    .await;

    let handle = poller(&backend, user_session(), Some("cs_test_9"))
        .with_schedule(Duration::from_millis(10), 5)
        .start();
    let status = handle.wait().await.unwrap();

    match status {
        ReconciliationStatus::Found(booking) => {
            assert_eq!(booking.id, "b1");
            assert_eq!(booking.status, BookingStatus::Confirmed);
        }
        other => panic!("expected found, got {:?}", other),
    }
    assert_eq!(backend.data().my_bookings_calls, 2);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(backend.data().my_bookings_calls, 2);
}

#[tokio::test]
async fn test_reconciliation_gives_up_after_max_attempts() {
    let backend = MockBackend::start_with(MockData {
        bookings: vec![booking_json("b1", "cs_other", "confirmed")],
        ..MockData::default()
    })
    .await;

    let handle = poller(&backend, user_session(), Some("cs_test_9")).start();
    let mut updates = handle.subscribe();
    let status = handle.wait().await.unwrap();
    assert_eq!(status, ReconciliationStatus::NotFound);
    assert_eq!(*updates.borrow_and_update(), ReconciliationStatus::NotFound);
    assert_eq!(backend.data().my_bookings_calls, 3);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(backend.data().my_bookings_calls, 3);
}

#[tokio::test]
async fn test_reconciliation_stops_on_rejected_token() {
    let backend = MockBackend::start().await;
    let session = Session::new("revoked-token", common::profile("Asha", false));

    let handle = poller(&backend, session, Some("cs_test_9")).start();
    let mut updates = handle.subscribe();
    let status = handle.wait().await.unwrap();
    assert_eq!(status, ReconciliationStatus::Unauthenticated);
    assert_eq!(status.notice().title, "Login Required");
    assert_eq!(*updates.borrow_and_update(), ReconciliationStatus::Unauthenticated);
    assert_eq!(backend.data().my_bookings_calls, 0);

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(backend.data().last_authorization.as_deref(), Some("revoked-token"));
}

#[tokio::test]
async fn test_reconciliation_without_session_id_confirms() {
    let backend = MockBackend::start().await;

    let status = poller(&backend, user_session(), None).run().await;
    assert_eq!(status, ReconciliationStatus::Confirmed);
    assert_eq!(status.notice().title, "Payment Successful!");
    assert_eq!(backend.data().my_bookings_calls, 0);
}

#[tokio::test]
async fn test_stopping_the_poller_stops_requests() {
    let backend = MockBackend::start().await;

    let handle = poller(&backend, user_session(), Some("cs_test_9"))
        .with_schedule(Duration::from_millis(30), 100)
        .start();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!handle.status().is_terminal());
    handle.stop();

    tokio::time::sleep(Duration::from_millis(20)).await;
    let calls = backend.data().my_bookings_calls;
    assert!(calls >= 1);
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(backend.data().my_bookings_calls, calls);
}

#[tokio::test]
async fn test_cancel_updates_list_in_place() {
    let backend = MockBackend::start_with(MockData {
        bookings: vec![
            booking_json("b1", "cs_1", "confirmed"),
            booking_json("b2", "cs_2", "cancelled"),
        ],
        ..MockData::default()
    })
    .await;
    let service = BookingService::new(api(&backend));
    let session = user_session();

    let mut list = service.my_bookings(&session).await.unwrap();
    assert!(list.can_cancel("b1"));
    assert!(!list.can_cancel("b2"));

    let notice = service.cancel(&session, &mut list, "b1").await.unwrap();
    assert_eq!(notice.title, "Booking Cancelled");
    assert_eq!(list.get("b1").unwrap().status, BookingStatus::Cancelled);
    assert_eq!(backend.data().my_bookings_calls, 1);

    let err = service.cancel(&session, &mut list, "b2").await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)));
    let err = service.cancel(&session, &mut list, "zzz").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
    assert_eq!(backend.data().cancelled, vec!["b1".to_string()]);
}

#[tokio::test]
async fn test_background_refresh_publishes_bookings() {
    let backend = MockBackend::start_with(MockData {
        bookings: vec![booking_json("b1", "cs_1", "confirmed")],
        ..MockData::default()
    })
    .await;
    let service = BookingService::new(api(&backend));

    let handle = service.start_refresh(user_session(), Duration::from_millis(10));
    let mut updates = handle.subscribe();
    tokio::time::timeout(Duration::from_secs(2), updates.wait_for(|b| b.is_some()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(handle.status().map(|b| b.len()), Some(1));
    handle.stop();
}
