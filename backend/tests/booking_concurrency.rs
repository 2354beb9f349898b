//! Slot capacity under concurrent joins.
//!
//! A gated store holds every joiner's first read of the bookings container
//! until all of them have read it, so every writer starts from the same
//! version. With compare-and-set writes the slot never exceeds its capacity;
//! a store that ignores the expected version accepts every join.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use futures::future::join_all;
use mockable::{Clock, DefaultClock};
use osce_backend::domain::collection::{BOOKINGS, USERS};
use osce_backend::domain::ports::{DocumentStore, DocumentStoreError, JoinRequest, VersionedDocument};
use osce_backend::domain::{BookingCoordinator, BookingError, Record, RecordStore, SlotKey};
use osce_backend::outbound::persistence::InMemoryDocumentStore;
use rstest::rstest;
use serde_json::{Map, Value, json};
use tokio::sync::Barrier;

const MOCK_ID: &str = "mock-a";
const SLOT: &str = "2025-04-01T09:00";

/// Delays the first `gated` reads of the bookings container until all of
/// them have arrived.
struct GatedStore {
    inner: InMemoryDocumentStore,
    barrier: Barrier,
    gated: usize,
    reads: AtomicUsize,
    versioned: bool,
}

impl GatedStore {
    fn new(gated: usize, versioned: bool) -> Self {
        Self {
            inner: InMemoryDocumentStore::new(),
            barrier: Barrier::new(gated),
            gated,
            reads: AtomicUsize::new(0),
            versioned,
        }
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn fetch(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<VersionedDocument>, DocumentStoreError> {
        let document = self.inner.fetch(collection, document_id).await?;
        if collection == BOOKINGS.name() && self.reads.fetch_add(1, Ordering::SeqCst) < self.gated {
            self.barrier.wait().await;
        }
        Ok(document)
    }

    async fn write(
        &self,
        collection: &str,
        document_id: &str,
        body: &Map<String, Value>,
        expected_version: u64,
    ) -> Result<u64, DocumentStoreError> {
        if self.versioned {
            return self
                .inner
                .write(collection, document_id, body, expected_version)
                .await;
        }
        // Last writer wins: overwrite whatever version is stored now.
        let current = self
            .inner
            .fetch(collection, document_id)
            .await?
            .map_or(0, |document| document.version);
        self.inner.write(collection, document_id, body, current).await
    }
}

fn email(index: usize) -> String {
    format!("student{index}@example.com")
}

fn record(value: Value) -> Record {
    value.as_object().cloned().expect("test literal is an object")
}

async fn coordinator(
    store: Arc<GatedStore>,
    students: usize,
    max_users: u32,
) -> BookingCoordinator<GatedStore> {
    let users = RecordStore::new(Arc::clone(&store));
    for index in 0..students {
        users
            .add(
                &USERS,
                record(json!({
                    "user_id": format!("u{index}"),
                    "email": email(index),
                    "booked_mocks": [],
                })),
                &["email"],
            )
            .await
            .expect("seed user");
    }
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    BookingCoordinator::new(RecordStore::new(store), clock).with_default_max_users(max_users)
}

async fn join_together(
    bookings: &BookingCoordinator<GatedStore>,
    students: usize,
) -> Vec<Result<(), BookingError>> {
    let requests: Vec<JoinRequest> = (0..students)
        .map(|index| JoinRequest {
            user: email(index),
            slot: SlotKey::new(MOCK_ID, SLOT),
            mock_name: "Cardiology".to_owned(),
        })
        .collect();
    join_all(
        requests
            .iter()
            .map(|request| async move { bookings.join(request).await.map(|_| ()) }),
    )
    .await
}

#[rstest]
#[case(6, 2)]
#[case(4, 1)]
#[case(3, 3)]
#[tokio::test]
async fn versioned_writes_never_overbook(#[case] students: usize, #[case] max_users: u32) {
    let store = Arc::new(GatedStore::new(students, true));
    let bookings = coordinator(store, students, max_users).await;

    let outcomes = join_together(&bookings, students).await;
    let accepted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    let capacity = usize::try_from(max_users).expect("small capacity");
    assert_eq!(accepted, capacity.min(students));
    assert!(outcomes.iter().all(|outcome| matches!(
        outcome,
        Ok(()) | Err(BookingError::CapacityExceeded { .. })
    )));

    let stored = bookings.list().await.expect("list bookings");
    let [booking] = stored.as_slice() else {
        panic!("expected a single slot, got {stored:?}");
    };
    assert_eq!(booking.booked_users.len(), accepted);
    assert!(booking.booked_users.len() <= booking.max_users as usize);
}

#[rstest]
#[tokio::test]
async fn unversioned_writes_accept_more_joins_than_seats() {
    let students = 5;
    let store = Arc::new(GatedStore::new(students, false));
    let bookings = coordinator(store, students, 2).await;

    let outcomes = join_together(&bookings, students).await;
    let accepted = outcomes.iter().filter(|outcome| outcome.is_ok()).count();
    assert!(accepted > 2, "every racer saw an empty slot");

    // Seats acknowledged to callers were silently lost.
    let stored = bookings.list().await.expect("list bookings");
    let seated: usize = stored.iter().map(|booking| booking.booked_users.len()).sum();
    assert!(seated < accepted);
}
