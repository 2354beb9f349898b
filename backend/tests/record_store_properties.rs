//! Record store properties exercised through the public API.
//!
//! The same roster is queried with many filters and windows and each result
//! is compared with a plain in-memory computation over the seeded array.

use std::sync::Arc;

use osce_backend::domain::ports::DocumentStore;
use osce_backend::domain::{Collection, Filters, Record, RecordStore, RecordStoreError};
use osce_backend::outbound::persistence::InMemoryDocumentStore;
use pagination::PageRequest;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const STAFF: Collection = Collection::new("staff", "rota", "staff");

fn record(value: Value) -> Record {
    value.as_object().cloned().expect("test literal is an object")
}

fn roster() -> Vec<Record> {
    [
        json!({ "id": "s1", "ward": "north", "grade": 1, "active": true }),
        json!({ "id": "s2", "ward": "south", "grade": 2, "active": true }),
        json!({ "id": "s3", "ward": "north", "grade": 2, "active": false }),
        json!({ "id": "s4", "ward": "north", "grade": 1, "active": true }),
        json!({ "id": "s5", "ward": "east", "grade": 3, "active": true }),
        json!({ "id": "s6", "ward": "south", "grade": 1, "active": false }),
        json!({ "id": "s7", "ward": "north", "grade": "1", "active": true }),
    ]
    .into_iter()
    .map(record)
    .collect()
}

struct Seeded {
    store: Arc<InMemoryDocumentStore>,
    records: RecordStore<InMemoryDocumentStore>,
}

impl Seeded {
    async fn container(&self) -> (Value, u64) {
        let document = self
            .store
            .fetch(STAFF.name(), STAFF.container_id())
            .await
            .expect("fetch container")
            .expect("container exists");
        (Value::Object(document.body), document.version)
    }
}

#[fixture]
async fn seeded() -> Seeded {
    let store = Arc::new(InMemoryDocumentStore::new());
    let mut body = record(json!({ "rota_owner": "ops", "updated": "2025-03-01" }));
    body.insert(
        STAFF.field().to_owned(),
        Value::Array(roster().into_iter().map(Value::Object).collect()),
    );
    store
        .write(STAFF.name(), STAFF.container_id(), &body, 0)
        .await
        .expect("seed container");
    Seeded {
        records: RecordStore::new(Arc::clone(&store)),
        store,
    }
}

fn expected(filters: &[(&str, Value)]) -> Vec<Record> {
    roster()
        .into_iter()
        .filter(|candidate| {
            filters
                .iter()
                .all(|(field, value)| candidate.get(*field) == Some(value))
        })
        .collect()
}

fn build(filters: &[(&str, Value)]) -> Filters {
    filters
        .iter()
        .fold(Filters::new(), |acc, (field, value)| acc.eq(*field, value.clone()))
}

#[rstest]
#[case(vec![])]
#[case(vec![("ward", json!("north"))])]
#[case(vec![("ward", json!("north")), ("grade", json!(1))])]
#[case(vec![("ward", json!("north")), ("active", json!(false))])]
#[case(vec![("grade", json!("1"))])]
#[case(vec![("ward", json!("west"))])]
#[case(vec![("missing", json!(null))])]
#[tokio::test]
async fn filters_return_exactly_the_matching_records(
    #[future] seeded: Seeded,
    #[case] filters: Vec<(&str, Value)>,
) {
    let ready = seeded.await;
    let found = ready
        .records
        .get(&STAFF, &build(&filters))
        .await
        .expect("get");
    assert_eq!(found, expected(&filters));
    assert!(found.iter().all(|candidate| build(&filters).matches(candidate)));
}

#[rstest]
#[case(0, Some(3))]
#[case(2, Some(2))]
#[case(3, None)]
#[case(4, Some(10))]
#[case(5, Some(1))]
#[case(9, Some(2))]
#[tokio::test]
async fn windows_slice_the_filtered_records(
    #[future] seeded: Seeded,
    #[case] offset: usize,
    #[case] limit: Option<usize>,
) {
    let ready = seeded.await;
    let filters = vec![("ward", json!("north"))];
    let window = ready
        .records
        .get_paginated(&STAFF, &build(&filters), PageRequest::new(offset, limit))
        .await
        .expect("paginate");

    let all = expected(&filters);
    let end = limit.map_or(all.len(), |limit| (offset + limit).min(all.len()));
    let slice = all.get(offset..end).map(<[Record]>::to_vec).unwrap_or_default();
    assert_eq!(window, slice);
}

#[rstest]
#[tokio::test]
async fn duplicate_adds_leave_the_container_untouched(#[future] seeded: Seeded) {
    let ready = seeded.await;
    let before = ready.container().await;

    let err = ready
        .records
        .add(
            &STAFF,
            record(json!({ "id": "s3", "ward": "east", "grade": 9 })),
            &["id"],
        )
        .await
        .expect_err("id s3 is taken");
    assert!(matches!(err, RecordStoreError::Conflict { .. }));
    assert_eq!(ready.container().await, before);
}

#[rstest]
#[tokio::test]
async fn accepted_adds_keep_the_rest_of_the_container(#[future] seeded: Seeded) {
    let ready = seeded.await;
    let (_, version) = ready.container().await;

    ready
        .records
        .add(&STAFF, record(json!({ "id": "s8", "ward": "east" })), &["id"])
        .await
        .expect("new id");

    let (body, next_version) = ready.container().await;
    assert_eq!(next_version, version + 1);
    assert_eq!(body["rota_owner"], "ops");
    assert_eq!(body["updated"], "2025-03-01");
    let count = ready
        .records
        .count(&STAFF, &Filters::new())
        .await
        .expect("count");
    assert_eq!(count, roster().len() + 1);
}

#[rstest]
#[case(&["id"], vec![json!("s99")])]
#[case(&["ward", "grade"], vec![json!("east"), json!(1)])]
#[tokio::test]
async fn deleting_absent_records_changes_nothing(
    #[future] seeded: Seeded,
    #[case] fields: &[&str],
    #[case] values: Vec<Value>,
) {
    let ready = seeded.await;
    let before = ready.container().await;

    let err = ready
        .records
        .delete(&STAFF, fields, &values)
        .await
        .expect_err("nothing matches");
    assert!(matches!(err, RecordStoreError::NotFound { .. }));
    assert_eq!(ready.container().await, before);
}
