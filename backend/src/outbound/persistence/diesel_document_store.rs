//! PostgreSQL-backed [`DocumentStore`] using Diesel.
//!
//! Each document is one row in `documents`. A first write inserts with
//! version 1 and a unique violation means another writer got there first;
//! later writes are guarded updates that only match the row when
//! its version still equals the caller's. A write that matches nothing
//! re-reads the row so the mismatch reports the version actually stored.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::RunQueryDsl;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::ports::{DocumentStore, DocumentStoreError, VersionedDocument};

use super::models::{DocumentRow, NewDocumentRow};
use super::pool::{DbPool, PoolError};
use super::schema::documents;

/// Diesel implementation of the [`DocumentStore`] port.
#[derive(Clone)]
pub struct DieselDocumentStore {
    pool: DbPool,
}

impl DieselDocumentStore {
    /// Wrap a connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DocumentStoreError {
    DocumentStoreError::connection(error.message())
}

fn map_diesel_error(error: DieselError) -> DocumentStoreError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DocumentStoreError::connection("database connection error")
        }
        DieselError::DeserializationError(err) | DieselError::SerializationError(err) => {
            DocumentStoreError::serialization(err.to_string())
        }
        _ => DocumentStoreError::query("database error"),
    }
}

fn to_db_version(version: u64) -> Result<i64, DocumentStoreError> {
    i64::try_from(version)
        .map_err(|_| DocumentStoreError::query(format!("version {version} out of range")))
}

fn from_db_version(version: i64) -> Result<u64, DocumentStoreError> {
    u64::try_from(version)
        .map_err(|_| DocumentStoreError::serialization(format!("negative stored version {version}")))
}

fn row_to_document(row: DocumentRow) -> Result<VersionedDocument, DocumentStoreError> {
    let Value::Object(body) = row.body else {
        return Err(DocumentStoreError::serialization(
            "stored document body is not an object",
        ));
    };
    Ok(VersionedDocument::new(body, from_db_version(row.version)?))
}

async fn current_version<C>(
    conn: &mut C,
    collection: &str,
    document_id: &str,
) -> Result<u64, DocumentStoreError>
where
    C: diesel_async::AsyncConnection<Backend = diesel::pg::Pg> + Send,
{
    let version = documents::table
        .filter(documents::collection_name.eq(collection))
        .filter(documents::document_id.eq(document_id))
        .select(documents::version)
        .first::<i64>(conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;
    version.map_or(Ok(0), from_db_version)
}

#[async_trait]
impl DocumentStore for DieselDocumentStore {
    async fn fetch(
        &self,
        collection: &str,
        document_id: &str,
    ) -> Result<Option<VersionedDocument>, DocumentStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = documents::table
            .filter(documents::collection_name.eq(collection))
            .filter(documents::document_id.eq(document_id))
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_document).transpose()
    }

    async fn write(
        &self,
        collection: &str,
        document_id: &str,
        body: &Map<String, Value>,
        expected_version: u64,
    ) -> Result<u64, DocumentStoreError> {
        let expected = to_db_version(expected_version)?;
        let next = expected
            .checked_add(1)
            .ok_or_else(|| DocumentStoreError::query("version counter exhausted"))?;
        let body = Value::Object(body.clone());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let written = if expected_version == 0 {
            let inserted = diesel::insert_into(documents::table)
                .values(&NewDocumentRow {
                    collection_name: collection,
                    document_id,
                    body: &body,
                    version: next,
                })
                .execute(&mut conn)
                .await;
            match inserted {
                Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => 0,
                other => other.map_err(map_diesel_error)?,
            }
        } else {
            diesel::update(
                documents::table
                    .filter(documents::collection_name.eq(collection))
                    .filter(documents::document_id.eq(document_id))
                    .filter(documents::version.eq(expected)),
            )
            .set((
                documents::body.eq(&body),
                documents::version.eq(next),
                documents::updated_at.eq(now),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?
        };

        if written == 0 {
            let actual = current_version(&mut conn, collection, document_id).await?;
            debug!(collection, document_id, expected_version, actual, "document write lost race");
            return Err(DocumentStoreError::version_mismatch(expected_version, actual));
        }
        from_db_version(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn object_rows_become_versioned_documents() {
        let row = DocumentRow {
            body: json!({"bookings": []}),
            version: 3,
        };
        let document = row_to_document(row).expect("object body");
        assert_eq!(document.version, 3);
        assert_eq!(document.body.get("bookings"), Some(&json!([])));
    }

    #[rstest]
    #[case(json!([1, 2]), 1)]
    #[case(json!({"a": 1}), -1)]
    fn malformed_rows_are_serialization_errors(#[case] body: Value, #[case] version: i64) {
        let err = row_to_document(DocumentRow { body, version }).expect_err("malformed");
        assert!(matches!(err, DocumentStoreError::Serialization { .. }));
    }

    #[rstest]
    fn versions_beyond_i64_are_rejected() {
        let err = to_db_version(u64::MAX).expect_err("overflow");
        assert!(matches!(err, DocumentStoreError::Query { .. }));
        assert_eq!(to_db_version(7).expect("small"), 7);
    }

    #[rstest]
    fn closed_connections_map_to_connection_errors() {
        let err = map_diesel_error(DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ));
        assert!(matches!(err, DocumentStoreError::Connection { .. }));
        assert!(matches!(
            map_diesel_error(DieselError::NotFound),
            DocumentStoreError::Query { .. }
        ));
    }
}
