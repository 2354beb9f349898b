//! Untyped rows stored inside a collection's array field.
//!
//! A [`Record`] is a JSON object. Identity is not structural: each Record
//! Store call names the fields that identify a row for that call.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::record_store::RecordStoreError;

/// One logical row: field name to value.
pub type Record = Map<String, Value>;

/// Conjunction of field equality tests.
///
/// A record matches when every named field is present and equal to the
/// expected value. Comparison is exact JSON equality, so `1` does not match
/// `"1"` and an integer does not match a float.
///
/// # Examples
/// ```
/// use osce_backend::domain::Filters;
/// use serde_json::json;
///
/// let filters = Filters::new().eq("mock_id", "m1").eq("completed", true);
/// let record = json!({ "mock_id": "m1", "completed": true, "extra": 3 });
/// assert!(filters.matches(record.as_object().expect("object")));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filters(Vec<(String, Value)>);

impl Filters {
    /// An empty filter that matches every record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality test.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((field.into(), value.into()));
        self
    }

    /// Add an equality test only when `value` is present.
    #[must_use]
    pub fn eq_opt(self, field: impl Into<String>, value: Option<impl Into<Value>>) -> Self {
        match value {
            Some(value) => self.eq(field, value),
            None => self,
        }
    }

    /// Whether no tests were added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `record` satisfies every test.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        self.0
            .iter()
            .all(|(field, expected)| record.get(field) == Some(expected))
    }
}

/// Encode a typed row as a record.
///
/// # Errors
///
/// Returns [`RecordStoreError::Corrupt`] when `value` does not serialise to
/// a JSON object.
pub fn to_record<T: Serialize>(value: &T) -> Result<Record, RecordStoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(RecordStoreError::corrupt(format!(
            "expected an object, found {}",
            kind_of(&other)
        ))),
        Err(err) => Err(RecordStoreError::corrupt(err.to_string())),
    }
}

/// Decode a record into a typed row.
///
/// # Errors
///
/// Returns [`RecordStoreError::Corrupt`] when the record lacks required
/// fields or carries values of the wrong shape.
pub fn from_record<T: DeserializeOwned>(record: Record) -> Result<T, RecordStoreError> {
    serde_json::from_value(Value::Object(record))
        .map_err(|err| RecordStoreError::corrupt(err.to_string()))
}

/// Decode the list held in `record[field]`; absent or null reads as empty.
///
/// # Errors
///
/// Returns [`RecordStoreError::Corrupt`] when the field is not a list of `T`.
pub fn read_list<T: DeserializeOwned>(record: &Record, field: &str) -> Result<Vec<T>, RecordStoreError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => serde_json::from_value(items.clone())
            .map_err(|err| RecordStoreError::corrupt(format!("{field}: {err}"))),
    }
}

/// Replace `record[field]` with `items`.
///
/// # Errors
///
/// Returns [`RecordStoreError::Corrupt`] when `items` cannot be encoded.
pub fn write_list<T: Serialize>(record: &mut Record, field: &str, items: &[T]) -> Result<(), RecordStoreError> {
    let encoded = serde_json::to_value(items)
        .map_err(|err| RecordStoreError::corrupt(format!("{field}: {err}")))?;
    record.insert(field.to_owned(), encoded);
    Ok(())
}

/// Overlay `patch` onto `base`; keys in `patch` win.
pub(crate) fn merge_shallow(base: &mut Record, patch: &Record) {
    for (key, value) in patch {
        base.insert(key.clone(), value.clone());
    }
}

pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
