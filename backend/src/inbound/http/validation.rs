//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs convert into domain inputs through these helpers so every
//! rejection carries the same `{field, code}` details shape.

use chrono::{DateTime, NaiveDateTime};
use pagination::PageParams;
use serde::Deserialize;
use serde_json::json;
use utoipa::IntoParams;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidDatetime,
    InvalidPage,
    OutOfRange,
}

impl ErrorCode {
    const fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidDatetime => "invalid_datetime",
            Self::InvalidPage => "invalid_page",
            Self::OutOfRange => "out_of_range",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    const fn as_str(self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

/// Trimmed, non-empty text.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value.map(|raw| raw.trim().to_owned()) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(missing_field_error(field)),
    }
}

/// Non-empty list of non-empty strings.
pub(crate) fn require_text_list(
    values: Option<Vec<String>>,
    field: FieldName,
) -> Result<Vec<String>, Error> {
    let values = values
        .filter(|list| !list.is_empty())
        .ok_or_else(|| missing_field_error(field))?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            let trimmed = value.trim().to_owned();
            if trimmed.is_empty() {
                Err(ValidationError::new(field, format!("{} must not contain blanks", field.as_str()))
                    .with_index(ErrorCode::MissingField, index))
            } else {
                Ok(trimmed)
            }
        })
        .collect()
}

/// Positive integer.
pub(crate) fn require_positive(value: Option<u32>, field: FieldName) -> Result<u32, Error> {
    match value {
        None => Err(missing_field_error(field)),
        Some(0) => Err(
            ValidationError::new(field, format!("{} must be positive", field.as_str()))
                .with_value(ErrorCode::OutOfRange, "0"),
        ),
        Some(positive) => Ok(positive),
    }
}

/// Slot datetimes are kept verbatim because they form part of the booking
/// id; they must still parse as RFC 3339 or as a local `YYYY-MM-DDTHH:MM`
/// (optionally with seconds).
pub(crate) fn require_slot_datetime(
    value: Option<String>,
    field: FieldName,
) -> Result<String, Error> {
    let text = require_text(value, field)?;
    let parses = DateTime::parse_from_rfc3339(&text).is_ok()
        || NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M").is_ok()
        || NaiveDateTime::parse_from_str(&text, "%Y-%m-%dT%H:%M:%S").is_ok();
    if parses {
        Ok(text)
    } else {
        let name = field.as_str();
        Err(ValidationError::new(field, format!("{name} must be a date and time"))
            .with_value(ErrorCode::InvalidDatetime, text))
    }
}

/// `?page&limit` query parameters; 1-based, defaulting to page 1 of 20.
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size, at most 100.
    pub limit: Option<u32>,
}

impl PageQuery {
    pub(crate) fn params(self) -> Result<PageParams, Error> {
        PageParams::from_query(self.page, self.limit).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "code": ErrorCode::InvalidPage.as_str() }))
        })
    }
}
