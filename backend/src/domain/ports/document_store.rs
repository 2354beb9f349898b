//! Port for the document-oriented backing store.
//!
//! A [`DocumentStore`] addresses whole documents by `(collection, document
//! id)`. Every document carries a monotonically increasing version so callers
//! can perform compare-and-set writes: a write names the version it read, and
//! the adapter rejects it with [`DocumentStoreError::VersionMismatch`] when
//! the stored version has moved on.
//!
//! Version `0` is reserved for "no document yet"; the first successful write
//! produces version `1`.

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The backing store could not be reached.
        Connection { message: String } =>
            "document store connection failed: {message}",
        /// A read or write failed while executing.
        Query { message: String } =>
            "document store query failed: {message}",
        /// The stored body could not be encoded or decoded.
        Serialization { message: String } =>
            "document store serialization failed: {message}",
        /// The document changed since it was read.
        VersionMismatch { expected: u64, actual: u64 } =>
            "document version mismatch: expected {expected}, found {actual}",
    }
}

/// A document body together with the version it was read at.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VersionedDocument {
    /// Top-level document fields.
    pub body: Map<String, Value>,
    /// Version of `body`; always at least 1 for stored documents.
    pub version: u64,
}

impl VersionedDocument {
    /// Pair a body with its version.
    pub fn new(body: Map<String, Value>, version: u64) -> Self {
        Self { body, version }
    }
}

/// Persistence port for versioned documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read a document, returning `None` when it has never been written.
    async fn fetch(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<VersionedDocument>, DocumentStoreError>;

    /// Replace a document body if its stored version equals
    /// `expected_version`, returning the new version.
    ///
    /// `expected_version == 0` creates the document and fails with
    /// [`DocumentStoreError::VersionMismatch`] if it already exists.
    async fn write(
        &self,
        collection: &str,
        document_id: &str,
        body: &Map<String, Value>,
        expected_version: u64,
    ) -> Result<u64, DocumentStoreError>;
}
