//! Process-local `DocumentStore` used when no database is configured and in
//! tests.
//!
//! Documents live in a `RwLock<HashMap>`; writes compare the caller's
//! expected version with the stored one under the write lock, which makes
//! each write an atomic compare-and-set.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::ports::{DocumentStore, DocumentStoreError, VersionedDocument};

type DocumentKey = (String, String);

/// In-memory versioned document store.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<DocumentKey, VersionedDocument>>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn key(collection: &str, document_id: &str) -> DocumentKey {
        (collection.to_owned(), document_id.to_owned())
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn fetch(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<VersionedDocument>, DocumentStoreError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| DocumentStoreError::connection("document lock poisoned (read)"))?;
        Ok(documents.get(&Self::key(collection, document_id)).cloned())
    }

    async fn write(
        &self,
        collection: &str,
        document_id: &str,
        body: &Map<String, Value>,
        expected_version: u64,
    ) -> Result<u64, DocumentStoreError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| DocumentStoreError::connection("document lock poisoned (write)"))?;
        let key = Self::key(collection, document_id);
        let actual = documents.get(&key).map_or(0, |document| document.version);
        if actual != expected_version {
            return Err(DocumentStoreError::version_mismatch(expected_version, actual));
        }
        let version = actual + 1;
        documents.insert(key, VersionedDocument::new(body.clone(), version));
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn body(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test literal is an object")
    }

    #[fixture]
    fn store() -> InMemoryDocumentStore {
        InMemoryDocumentStore::new()
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_documents_read_as_none(store: InMemoryDocumentStore) {
        let fetched = store.fetch("bookings", "schedule").await.expect("fetch");
        assert!(fetched.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn first_write_creates_version_one(store: InMemoryDocumentStore) {
        let version = store
            .write("bookings", "schedule", &body(json!({ "bookings": [] })), 0)
            .await
            .expect("create");
        assert_eq!(version, 1);

        let fetched = store
            .fetch("bookings", "schedule")
            .await
            .expect("fetch")
            .expect("document exists");
        assert_eq!(fetched.version, 1);
        assert_eq!(fetched.body, body(json!({ "bookings": [] })));
    }

    #[rstest]
    #[tokio::test]
    async fn stale_writes_are_rejected_without_changes(store: InMemoryDocumentStore) {
        store
            .write("users", "directory", &body(json!({ "users": [1] })), 0)
            .await
            .expect("create");
        store
            .write("users", "directory", &body(json!({ "users": [1, 2] })), 1)
            .await
            .expect("update");

        let err = store
            .write("users", "directory", &body(json!({ "users": [] })), 1)
            .await
            .expect_err("version 1 is stale");
        assert_eq!(err, DocumentStoreError::version_mismatch(1_u64, 2_u64));

        let fetched = store
            .fetch("users", "directory")
            .await
            .expect("fetch")
            .expect("document exists");
        assert_eq!(fetched.body, body(json!({ "users": [1, 2] })));
    }

    #[rstest]
    #[tokio::test]
    async fn creating_an_existing_document_is_a_mismatch(store: InMemoryDocumentStore) {
        store
            .write("mocks", "catalogue", &Map::new(), 0)
            .await
            .expect("create");
        let err = store
            .write("mocks", "catalogue", &Map::new(), 0)
            .await
            .expect_err("already exists");
        assert_eq!(err, DocumentStoreError::version_mismatch(0_u64, 1_u64));
    }

    #[rstest]
    #[tokio::test]
    async fn documents_are_keyed_by_collection_and_id(store: InMemoryDocumentStore) {
        store
            .write("mocks", "catalogue", &body(json!({ "mocks": [] })), 0)
            .await
            .expect("create");
        assert!(
            store
                .fetch("stations", "catalogue")
                .await
                .expect("fetch")
                .is_none()
        );
    }
}
