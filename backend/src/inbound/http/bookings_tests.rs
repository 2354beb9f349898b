//! HTTP tests for the booking handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::collection::{BOOKINGS, USERS};
use crate::inbound::http::test_utils::{
    StatePorts, admin_identity, identity, in_memory_state, test_app,
};
use crate::outbound::persistence::InMemoryDocumentStore;
use crate::test_support::seed;

const ALICE: [(&str, &str); 2] = [("x-user-id", "u-alice"), ("x-user-email", "alice@example.com")];

#[fixture]
async fn store() -> Arc<InMemoryDocumentStore> {
    let store = InMemoryDocumentStore::new();
    seed(
        &store,
        &USERS,
        json!([
            {"user_id": "u-alice", "email": "alice@example.com"},
            {"user_id": "u-bob", "email": "bob@example.com"},
        ]),
    )
    .await;
    Arc::new(store)
}

fn slot(mock_id: &str, datetime: &str) -> SlotRequest {
    SlotRequest {
        mock_id: Some(mock_id.to_owned()),
        datetime: Some(datetime.to_owned()),
        mock_name: Some("Cardiology".to_owned()),
    }
}

async fn send(
    state: HttpState,
    mut request: test::TestRequest,
    headers: &[(&'static str, &'static str)],
) -> (StatusCode, Value) {
    let app = test::init_service(test_app(state)).await;
    for header in headers {
        request = request.insert_header(*header);
    }
    let response = test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn join_move_and_cancel_round_trip(#[future] store: Arc<InMemoryDocumentStore>) {
    let app = test::init_service(test_app(in_memory_state(store.await))).await;

    let join = test::TestRequest::post()
        .uri("/api/v1/bookings")
        .insert_header(ALICE[0])
        .insert_header(ALICE[1])
        .set_json(JoinBookingsRequest {
            slots: Some(vec![slot("mock-a", "2025-03-01T09:00")]),
        })
        .to_request();
    let response = test::call_service(&app, join).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let receipts: Vec<BookingReceiptBody> = test::read_body_json(response).await;
    assert_eq!(receipts.len(), 1);
    assert_eq!(receipts[0].booking.booking_id, "mock-a_2025-03-01T09:00");
    assert_eq!(receipts[0].booking.booked_users, vec!["alice@example.com"]);
    assert_eq!(receipts[0].mirror.mock_datetime, "2025-03-01T09:00");

    let relocate = test::TestRequest::put()
        .uri("/api/v1/bookings/mock-a")
        .insert_header(ALICE[0])
        .insert_header(ALICE[1])
        .set_json(MoveBookingRequest {
            new_datetime: Some("2025-03-02T09:00".to_owned()),
            mock_name: None,
        })
        .to_request();
    let moved: MoveReceiptBody = test::call_and_read_body_json(&app, relocate).await;
    assert_eq!(moved.from_datetime, "2025-03-01T09:00");
    assert_eq!(moved.booking.booking_datetime, "2025-03-02T09:00");

    let list = test::TestRequest::get()
        .uri("/api/v1/bookings")
        .insert_header(ALICE[0])
        .insert_header(ALICE[1])
        .to_request();
    let bookings: Vec<Booking> = test::call_and_read_body_json(&app, list).await;
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].booking_id, "mock-a_2025-03-02T09:00");

    let cancel = test::TestRequest::delete()
        .uri("/api/v1/bookings/mock-a")
        .insert_header(ALICE[0])
        .insert_header(ALICE[1])
        .to_request();
    let cancelled: Booking = test::call_and_read_body_json(&app, cancel).await;
    assert_eq!(cancelled.booked_users, vec!["alice@example.com"]);

    let reconcile = test::TestRequest::post()
        .uri("/api/v1/bookings/reconcile")
        .insert_header(ALICE[0])
        .insert_header(ALICE[1])
        .to_request();
    let report: ReconcileBody = test::call_and_read_body_json(&app, reconcile).await;
    assert!(report.clean);
}

#[rstest]
#[actix_web::test]
async fn full_slots_are_conflicts(#[future] store: Arc<InMemoryDocumentStore>) {
    let seeded = store.await;
    seed(
        &seeded,
        &BOOKINGS,
        json!([{
            "booking_id": "mock-a_2025-03-01T09:00",
            "mock_id": "mock-a",
            "mock_name": "Cardiology",
            "booking_datetime": "2025-03-01T09:00",
            "booked_users": ["bob@example.com"],
            "max_users": 1,
        }]),
    )
    .await;

    let (status, body) = send(
        in_memory_state(seeded),
        test::TestRequest::post()
            .uri("/api/v1/bookings")
            .set_json(JoinBookingsRequest {
                slots: Some(vec![slot("mock-a", "2025-03-01T09:00")]),
            }),
        &ALICE,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
    assert_eq!(body["details"]["code"], "slot_full");
}

#[rstest]
#[case(JoinBookingsRequest { slots: None }, "slots")]
#[case(JoinBookingsRequest { slots: Some(vec![]) }, "slots")]
#[case(
    JoinBookingsRequest { slots: Some(vec![SlotRequest { mock_id: None, ..slot("x", "2025-03-01T09:00") }]) },
    "mock_id"
)]
#[case(JoinBookingsRequest { slots: Some(vec![slot("mock-a", "soon")]) }, "datetime")]
#[actix_web::test]
async fn malformed_joins_are_rejected_before_booking(
    #[case] payload: JoinBookingsRequest,
    #[case] field: &str,
) {
    let (status, body) = send(
        StatePorts::default().into_state(),
        test::TestRequest::post()
            .uri("/api/v1/bookings")
            .set_json(payload),
        &identity("u-alice", "alice@example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], field);
}

#[rstest]
#[actix_web::test]
async fn unparseable_bodies_use_the_error_payload() {
    let (status, body) = send(
        StatePorts::default().into_state(),
        test::TestRequest::post()
            .uri("/api/v1/bookings")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json"),
        &identity("u-alice", "alice@example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "invalid_json");
}

#[rstest]
#[actix_web::test]
async fn anonymous_callers_are_unauthorised() {
    let (status, body) = send(
        StatePorts::default().into_state(),
        test::TestRequest::get().uri("/api/v1/bookings"),
        &[],
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[rstest]
#[actix_web::test]
async fn partial_failures_surface_which_half_committed() {
    let mut ports = StatePorts::default();
    ports.bookings.expect_join().times(1).returning(|_| {
        Err(Error::partial_failure("Booking could not be recorded on the profile")
            .with_details(json!({
                "code": "partial_failure",
                "stage": "user_mirror",
                "bookingCommitted": true,
                "compensated": false,
            })))
    });

    let (status, body) = send(
        ports.into_state(),
        test::TestRequest::post()
            .uri("/api/v1/bookings")
            .set_json(JoinBookingsRequest {
                slots: Some(vec![slot("mock-a", "2025-03-01T09:00")]),
            }),
        &identity("u-alice", "alice@example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "partial_failure");
    assert_eq!(body["details"]["stage"], "user_mirror");
    assert_eq!(body["details"]["bookingCommitted"], true);
}

#[rstest]
#[actix_web::test]
async fn batch_joins_forward_every_slot_for_the_caller() {
    let mut ports = StatePorts::default();
    ports
        .bookings
        .expect_join()
        .withf(|requests| {
            requests.len() == 2
                && requests
                    .iter()
                    .all(|request| request.user == "alice@example.com")
        })
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let (status, body) = send(
        ports.into_state(),
        test::TestRequest::post()
            .uri("/api/v1/bookings")
            .set_json(JoinBookingsRequest {
                slots: Some(vec![
                    slot("mock-a", "2025-03-01T09:00"),
                    slot("mock-b", "2025-03-01T11:00"),
                ]),
            }),
        &identity("u-alice", "Alice@Example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!([]));
}

#[rstest]
#[actix_web::test]
async fn reconciling_someone_else_requires_an_admin() {
    let (status, _) = send(
        StatePorts::default().into_state(),
        test::TestRequest::post().uri("/api/v1/bookings/reconcile?email=bob@example.com"),
        &identity("u-alice", "alice@example.com"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let mut ports = StatePorts::default();
    ports
        .bookings
        .expect_reconcile()
        .withf(|email| email == "bob@example.com")
        .times(1)
        .returning(|_| Ok(ReconcileReport::default()));
    let (status, body) = send(
        ports.into_state(),
        test::TestRequest::post().uri("/api/v1/bookings/reconcile?email=Bob@Example.com"),
        &admin_identity(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["clean"], true);
}
