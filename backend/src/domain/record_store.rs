//! Array-backed record store.
//!
//! Treats one field of one container document as an unbounded array of
//! [`Record`]s and offers add, filtered get, paginated get, upsert and
//! delete over it. Every mutation is a full-array read-modify-write guarded
//! by the container's version: the write only lands if nobody else wrote the
//! container since it was read, and a lost race is retried from a fresh read
//! a bounded number of times before surfacing
//! [`RecordStoreError::BackendUnavailable`].
//!
//! Operations never panic and never leak adapter error types; every outcome
//! is a [`Result`] tagged with a [`RecordStoreError`] kind.

use std::sync::Arc;

use pagination::PageRequest;
use serde_json::{Map, Value};
use tracing::debug;

use super::collection::Collection;
use super::ports::{DocumentStore, DocumentStoreError, define_port_error};
use super::record::{Filters, Record, kind_of, merge_shallow};
use super::Error;

/// Optimistic-concurrency attempts used when none are configured.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

define_port_error! {
    /// Failure kinds reported by the record store.
    pub enum RecordStoreError {
        /// Container, field, or addressed record is absent.
        NotFound { message: String } => "{message}",
        /// Another record already holds a unique value.
        Conflict { field: String } => "Item with {field} already exists",
        /// The call itself is malformed.
        Validation { message: String } => "{message}",
        /// The backend is unreachable or stayed contended for every attempt.
        BackendUnavailable { message: String } => "record store unavailable: {message}",
        /// Stored data does not have the shape of a record array.
        Corrupt { message: String } => "stored records are malformed: {message}",
    }
}

impl From<RecordStoreError> for Error {
    fn from(error: RecordStoreError) -> Self {
        match error {
            RecordStoreError::NotFound { message } => Self::not_found(message),
            RecordStoreError::Conflict { field } => {
                let message = format!("Item with {field} already exists");
                Self::conflict(message)
                    .with_details(serde_json::json!({ "code": "duplicate", "field": field }))
            }
            RecordStoreError::Validation { message } => Self::invalid_request(message),
            RecordStoreError::BackendUnavailable { message } => Self::service_unavailable(message),
            RecordStoreError::Corrupt { message } => Self::internal(message),
        }
    }
}

/// How much of the addressed array existed when it was read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// The container document has never been written.
    MissingContainer,
    /// The container exists but has no such array field.
    MissingField,
    /// The array field exists (possibly empty).
    Present,
}

impl Presence {
    /// Whether the array field was there to read.
    #[must_use]
    pub const fn is_present(self) -> bool {
        matches!(self, Self::Present)
    }
}

/// Decision returned by a mutation closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation<T> {
    /// Persist the edited array and return the value.
    Write(T),
    /// Leave storage untouched and return the value.
    Skip(T),
}

/// Error from [`RecordStore::mutate`]: a store failure or the closure's own
/// rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationError<E> {
    /// The store could not complete the read-modify-write.
    Store(RecordStoreError),
    /// The closure refused the edit.
    Rejected(E),
}

impl<E: From<RecordStoreError>> MutationError<E> {
    /// Collapse into the caller's error type.
    pub fn into_inner(self) -> E {
        match self {
            Self::Store(err) => E::from(err),
            Self::Rejected(err) => err,
        }
    }
}

/// Result of [`RecordStore::update_or_insert`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// An existing record was merged in place.
    Updated,
    /// The record was appended.
    Inserted,
}

/// Record store over a [`DocumentStore`].
pub struct RecordStore<S> {
    store: Arc<S>,
    max_attempts: u32,
}

impl<S> Clone for RecordStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            max_attempts: self.max_attempts,
        }
    }
}

impl<S> RecordStore<S> {
    /// Create a store that retries contended writes [`DEFAULT_MAX_ATTEMPTS`]
    /// times.
    pub fn new(store: Arc<S>) -> Self {
        Self::with_max_attempts(store, DEFAULT_MAX_ATTEMPTS)
    }

    /// Create a store with an explicit attempt bound (at least one).
    pub fn with_max_attempts(store: Arc<S>, max_attempts: u32) -> Self {
        Self {
            store,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Attempt bound for contended writes.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }
}

fn map_store_error(error: DocumentStoreError) -> RecordStoreError {
    match error {
        DocumentStoreError::Connection { message } => RecordStoreError::backend_unavailable(message),
        DocumentStoreError::Query { message } => RecordStoreError::backend_unavailable(message),
        DocumentStoreError::Serialization { message } => RecordStoreError::corrupt(message),
        DocumentStoreError::VersionMismatch { expected, actual } => {
            RecordStoreError::backend_unavailable(format!(
                "unexpected version mismatch (expected {expected}, found {actual})"
            ))
        }
    }
}

fn missing_container(collection: &Collection) -> RecordStoreError {
    RecordStoreError::not_found(format!(
        "Document {} does not exist in {}",
        collection.container_id(),
        collection.name()
    ))
}

fn missing_field(collection: &Collection) -> RecordStoreError {
    RecordStoreError::not_found(format!("No items found in {}", collection.field()))
}

/// Split a container body into its record array and presence marker.
fn read_array(
    body: &Map<String, Value>,
    collection: &Collection,
) -> Result<(Vec<Record>, Presence), RecordStoreError> {
    let Some(field) = body.get(collection.field()) else {
        return Ok((Vec::new(), Presence::MissingField));
    };
    let Value::Array(items) = field else {
        return Err(RecordStoreError::corrupt(format!(
            "{collection} holds {} instead of an array",
            kind_of(field)
        )));
    };
    items
        .iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(record) => Ok(record.clone()),
            other => Err(RecordStoreError::corrupt(format!(
                "{collection}[{index}] is {} instead of a record",
                kind_of(other)
            ))),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(|records| (records, Presence::Present))
}

fn require_present(presence: Presence, collection: &Collection) -> Result<(), RecordStoreError> {
    match presence {
        Presence::MissingContainer => Err(missing_container(collection)),
        Presence::MissingField => Err(missing_field(collection)),
        Presence::Present => Ok(()),
    }
}

/// First unique field that `candidate` collides on with `existing`.
fn clashing_field<'f>(
    existing: &Record,
    candidate: &Record,
    unique_fields: &[&'f str],
) -> Option<&'f str> {
    unique_fields.iter().copied().find(|field| {
        candidate
            .get(*field)
            .is_some_and(|value| existing.get(*field) == Some(value))
    })
}

impl<S: DocumentStore> RecordStore<S> {
    async fn snapshot(
        &self,
        collection: &Collection,
    ) -> Result<(Vec<Record>, Presence, Map<String, Value>, u64), RecordStoreError> {
        let document = self
            .store
            .fetch(collection.name(), collection.container_id())
            .await
            .map_err(map_store_error)?;
        match document {
            Some(document) => {
                let (records, presence) = read_array(&document.body, collection)?;
                Ok((records, presence, document.body, document.version))
            }
            None => Ok((Vec::new(), Presence::MissingContainer, Map::new(), 0)),
        }
    }

    /// Run a read-modify-write over the collection's array.
    ///
    /// `apply` receives a fresh copy of the array on every attempt and may
    /// run more than once, so it must not have side effects beyond the
    /// array it is given. Returning [`Mutation::Skip`] ends the call without
    /// writing. Keys of the container other than the array field are kept.
    ///
    /// # Errors
    ///
    /// [`MutationError::Rejected`] carries the closure's error unchanged;
    /// [`MutationError::Store`] reports read failures, corrupt data, and
    /// [`RecordStoreError::BackendUnavailable`] once every attempt lost its
    /// race.
    pub async fn mutate<T, E, F>(
        &self,
        collection: &Collection,
        mut apply: F,
    ) -> Result<T, MutationError<E>>
    where
        F: FnMut(&mut Vec<Record>, Presence) -> Result<Mutation<T>, E> + Send,
        T: Send,
        E: Send,
    {
        for attempt in 1..=self.max_attempts {
            let (mut records, presence, mut body, version) =
                self.snapshot(collection).await.map_err(MutationError::Store)?;

            let output = match apply(&mut records, presence).map_err(MutationError::Rejected)? {
                Mutation::Skip(output) => return Ok(output),
                Mutation::Write(output) => output,
            };

            body.insert(
                collection.field().to_owned(),
                Value::Array(records.into_iter().map(Value::Object).collect()),
            );
            match self
                .store
                .write(collection.name(), collection.container_id(), &body, version)
                .await
            {
                Ok(new_version) => {
                    debug!(%collection, attempt, version = new_version, "records written");
                    return Ok(output);
                }
                Err(DocumentStoreError::VersionMismatch { expected, actual }) => {
                    debug!(%collection, attempt, expected, actual, "container moved on; retrying");
                }
                Err(err) => return Err(MutationError::Store(map_store_error(err))),
            }
        }

        Err(MutationError::Store(RecordStoreError::backend_unavailable(
            format!(
                "{collection} stayed contended for {} attempts",
                self.max_attempts
            ),
        )))
    }

    /// Edit the first record whose `key_field` equals `key_value`.
    ///
    /// # Errors
    ///
    /// [`RecordStoreError::NotFound`] (as [`MutationError::Store`]) when no
    /// record carries the key; otherwise as [`RecordStore::mutate`].
    pub async fn modify_record<T, E, F>(
        &self,
        collection: &Collection,
        key_field: &str,
        key_value: &Value,
        mut apply: F,
    ) -> Result<T, MutationError<E>>
    where
        F: FnMut(&mut Record) -> Result<Mutation<T>, E> + Send,
        T: Send,
        E: Send,
    {
        self.mutate(collection, |records, _| {
            let Some(record) = records
                .iter_mut()
                .find(|record| record.get(key_field) == Some(key_value))
            else {
                return Err(MutationError::Store(RecordStoreError::not_found(format!(
                    "No record with {key_field} = {key_value} in {}",
                    collection.field()
                ))));
            };
            apply(record).map_err(MutationError::Rejected)
        })
        .await
        .map_err(|err| match err {
            MutationError::Store(err) | MutationError::Rejected(MutationError::Store(err)) => {
                MutationError::Store(err)
            }
            MutationError::Rejected(MutationError::Rejected(err)) => MutationError::Rejected(err),
        })
    }

    /// Append `record` unless another record already has the same value on
    /// every field in `unique_fields`.
    ///
    /// A missing container starts as an empty array.
    ///
    /// # Errors
    ///
    /// [`RecordStoreError::Conflict`] on a duplicate (storage untouched),
    /// [`RecordStoreError::Validation`] when `record` lacks a unique field.
    pub async fn add(
        &self,
        collection: &Collection,
        record: Record,
        unique_fields: &[&str],
    ) -> Result<(), RecordStoreError> {
        if let Some(field) = unique_fields.iter().find(|field| !record.contains_key(**field)) {
            return Err(RecordStoreError::validation(format!(
                "record is missing unique field {field}"
            )));
        }

        self.mutate(collection, |records, _| {
            let duplicate = !unique_fields.is_empty()
                && records.iter().any(|existing| {
                    unique_fields
                        .iter()
                        .all(|field| existing.get(*field) == record.get(*field))
                });
            if duplicate {
                return Err(RecordStoreError::conflict(unique_fields.join(", ")));
            }
            records.push(record.clone());
            Ok(Mutation::Write(()))
        })
        .await
        .map_err(MutationError::into_inner)
    }

    /// Records matching every filter, in stored order.
    ///
    /// # Errors
    ///
    /// [`RecordStoreError::NotFound`] when the container or field is absent.
    pub async fn get(
        &self,
        collection: &Collection,
        filters: &Filters,
    ) -> Result<Vec<Record>, RecordStoreError> {
        let (records, presence, _, _) = self.snapshot(collection).await?;
        require_present(presence, collection)?;
        Ok(records
            .into_iter()
            .filter(|record| filters.matches(record))
            .collect())
    }

    /// Records matching every filter with the container version they were
    /// read at. A missing container or field reads as empty; a container
    /// that was never written has version 0.
    ///
    /// Comparing the version with a later read tells whether the array
    /// changed in between.
    ///
    /// # Errors
    ///
    /// Read failures and [`RecordStoreError::Corrupt`] arrays.
    pub async fn get_versioned(
        &self,
        collection: &Collection,
        filters: &Filters,
    ) -> Result<(Vec<Record>, u64), RecordStoreError> {
        let (records, _, _, version) = self.snapshot(collection).await?;
        let matching = records
            .into_iter()
            .filter(|record| filters.matches(record))
            .collect();
        Ok((matching, version))
    }

    /// Filtered records windowed by `window` (skip `offset`, then take
    /// `limit`).
    ///
    /// # Errors
    ///
    /// As [`RecordStore::get`]. An offset past the end is an empty result.
    pub async fn get_paginated(
        &self,
        collection: &Collection,
        filters: &Filters,
        window: PageRequest,
    ) -> Result<Vec<Record>, RecordStoreError> {
        self.get(collection, filters)
            .await
            .map(|records| window.apply(records))
    }

    /// Number of records matching `filters`.
    ///
    /// # Errors
    ///
    /// As [`RecordStore::get`].
    pub async fn count(
        &self,
        collection: &Collection,
        filters: &Filters,
    ) -> Result<usize, RecordStoreError> {
        self.get(collection, filters).await.map(|records| records.len())
    }

    /// Merge `record` onto the first stored record sharing a value on any
    /// unique field, or append it when none does.
    ///
    /// Records are scanned in order and the first one matching on any
    /// listed field wins. Before the merge is written, every other record
    /// is checked for the same value on any unique field. With no unique
    /// fields the record is always appended.
    ///
    /// # Errors
    ///
    /// [`RecordStoreError::Conflict`] when the merge would duplicate a
    /// unique value held elsewhere, [`RecordStoreError::Validation`] when
    /// unique fields are given but `record` carries none of them.
    pub async fn update_or_insert(
        &self,
        collection: &Collection,
        record: Record,
        unique_fields: &[&str],
    ) -> Result<UpsertOutcome, RecordStoreError> {
        if !unique_fields.is_empty()
            && !unique_fields.iter().any(|field| record.contains_key(*field))
        {
            return Err(RecordStoreError::validation(format!(
                "record carries none of the unique fields: {}",
                unique_fields.join(", ")
            )));
        }

        self.mutate(collection, |records, _| {
            let matched = records
                .iter()
                .position(|existing| clashing_field(existing, &record, unique_fields).is_some());
            let Some(index) = matched else {
                records.push(record.clone());
                return Ok(Mutation::Write(UpsertOutcome::Inserted));
            };

            let conflict = records
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index)
                .find_map(|(_, other)| clashing_field(other, &record, unique_fields));
            if let Some(field) = conflict {
                return Err(RecordStoreError::conflict(field));
            }

            if let Some(existing) = records.get_mut(index) {
                merge_shallow(existing, &record);
            }
            Ok(Mutation::Write(UpsertOutcome::Updated))
        })
        .await
        .map_err(MutationError::into_inner)
    }

    /// Remove every record whose `unique_fields` all equal the positional
    /// `unique_values`, returning how many went.
    ///
    /// # Errors
    ///
    /// [`RecordStoreError::Validation`] for empty or mismatched arguments,
    /// [`RecordStoreError::NotFound`] when the container or field is absent
    /// or nothing matched (storage untouched).
    pub async fn delete(
        &self,
        collection: &Collection,
        unique_fields: &[&str],
        unique_values: &[Value],
    ) -> Result<usize, RecordStoreError> {
        if unique_fields.is_empty() || unique_values.is_empty() {
            return Err(RecordStoreError::validation(
                "Both unique fields and values are required",
            ));
        }
        if unique_fields.len() != unique_values.len() {
            return Err(RecordStoreError::validation(
                "Number of unique fields must match number of values",
            ));
        }

        self.mutate(collection, |records, presence| {
            require_present(presence, collection)?;
            let before = records.len();
            records.retain(|record| {
                !unique_fields
                    .iter()
                    .zip(unique_values)
                    .all(|(field, value)| record.get(*field) == Some(value))
            });
            match before - records.len() {
                0 => Err(RecordStoreError::not_found("Item not found")),
                removed => Ok(Mutation::Write(removed)),
            }
        })
        .await
        .map_err(MutationError::into_inner)
    }
}

#[cfg(test)]
#[path = "record_store_tests.rs"]
mod tests;
