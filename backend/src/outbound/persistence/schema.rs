//! Diesel table definitions. Keep in step with `backend/migrations`.

diesel::table! {
    /// Versioned JSON documents keyed by collection and document id.
    documents (collection_name, document_id) {
        collection_name -> Text,
        document_id -> Text,
        body -> Jsonb,
        /// Compare-and-set counter; starts at 1.
        version -> Int8,
        updated_at -> Timestamptz,
    }
}
