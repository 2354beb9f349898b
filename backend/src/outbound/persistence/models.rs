//! Internal Diesel row structs. Never exposed to the domain.

use diesel::prelude::*;

use super::schema::documents;

/// Row read from `documents`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub body: serde_json::Value,
    pub version: i64,
}

/// Row inserted for a document's first version.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = documents)]
pub(crate) struct NewDocumentRow<'a> {
    pub collection_name: &'a str,
    pub document_id: &'a str,
    pub body: &'a serde_json::Value,
    pub version: i64,
}

