//! Stations and mocks.
//!
//! Stations are free-form clinical scenario records addressed by
//! `station_id`. A mock references stations by id; listing mocks swaps each
//! id for the station record, or for an inline error marker when the station
//! cannot be resolved. A missing station never fails the listing.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::record::Record;

/// Marker text for an unresolved station.
pub const STATION_NOT_FOUND: &str = "Station not found.";

/// Clinical scenario record, stored as given.
pub type Station = Record;

/// Timed bundle of stations with bookable slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Mock {
    /// UUID assigned at creation.
    pub mock_id: String,
    /// Display name.
    pub name: String,
    /// Length in minutes.
    pub duration: u32,
    /// Station ids in running order.
    pub stations: Vec<String>,
    /// Session starts open for booking.
    #[serde(default)]
    pub available_slots: Vec<String>,
    /// Creation or last update time (RFC 3339).
    #[serde(default)]
    pub created_at: String,
    /// Id of the admin who last wrote the mock.
    #[serde(default)]
    pub created_by: String,
}

/// Admin-supplied mock fields, already validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockDraft {
    /// Display name; non-empty.
    pub name: String,
    /// Length in minutes; positive.
    pub duration: u32,
    /// Station ids; non-empty.
    pub station_ids: Vec<String>,
    /// Bookable session starts.
    pub available_slots: Vec<String>,
}

/// A station reference after lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum StationEntry {
    /// The station record.
    #[schema(value_type = Object)]
    Found(Station),
    /// Lookup failed; serialises as `{"error": "Station not found."}`.
    Missing {
        /// Human-readable reason.
        error: String,
    },
}

impl StationEntry {
    /// Marker used when a station id resolves to nothing.
    pub fn missing() -> Self {
        Self::Missing {
            error: STATION_NOT_FOUND.to_owned(),
        }
    }

    /// Whether the lookup succeeded.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Mock with its stations resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EnrichedMock {
    /// UUID assigned at creation.
    pub mock_id: String,
    /// Display name.
    pub name: String,
    /// Length in minutes.
    pub duration: u32,
    /// Resolved stations in running order.
    pub stations: Vec<StationEntry>,
    /// Session starts open for booking.
    pub available_slots: Vec<String>,
    /// Creation or last update time.
    pub created_at: String,
    /// Id of the admin who last wrote the mock.
    pub created_by: String,
}

/// Resolve each of `mock`'s station ids against `stations` by `station_id`.
pub fn enrich(mock: Mock, stations: &[Station]) -> EnrichedMock {
    let resolved = mock
        .stations
        .iter()
        .map(|id| {
            stations
                .iter()
                .find(|station| station.get("station_id").and_then(|v| v.as_str()) == Some(id))
                .map_or_else(StationEntry::missing, |station| {
                    StationEntry::Found(station.clone())
                })
        })
        .collect();
    EnrichedMock {
        mock_id: mock.mock_id,
        name: mock.name,
        duration: mock.duration,
        stations: resolved,
        available_slots: mock.available_slots,
        created_at: mock.created_at,
        created_by: mock.created_by,
    }
}
