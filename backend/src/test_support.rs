//! Test utilities shared by the crate's unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use serde_json::Value;

use crate::domain::ports::DocumentStore;
use crate::domain::{Collection, Record};
use crate::outbound::persistence::InMemoryDocumentStore;

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 8, 15, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

/// Convert a JSON object literal into a record.
pub(crate) fn record(value: Value) -> Record {
    value
        .as_object()
        .cloned()
        .expect("test literal is an object")
}

/// Write `records` as the array of `collection` in a fresh container.
pub(crate) async fn seed(store: &InMemoryDocumentStore, collection: &Collection, records: Value) {
    let mut body = serde_json::Map::new();
    body.insert(collection.field().to_owned(), records);
    store
        .write(collection.name(), collection.container_id(), &body, 0)
        .await
        .expect("seed container");
}
