//! OpenAPI schema definitions for payloads without a typed domain struct.
//!
//! Stations are free-form records and pages come from the `pagination`
//! crate, which has no utoipa dependency. These wrappers document their
//! shape without coupling either to the framework.

use utoipa::ToSchema;

use crate::domain::UserProfile;

/// OpenAPI schema for a station record.
///
/// Only the identifying fields are fixed; stations carry further
/// scenario-specific fields.
#[derive(ToSchema)]
#[schema(as = Station)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct StationSchema {
    /// Station identifier.
    #[schema(example = "station-cardio-1")]
    station_id: String,
    /// Mock the station belongs to.
    #[schema(example = "mock-a")]
    mock_id: String,
}

/// OpenAPI schema for a page of stations.
#[derive(ToSchema)]
#[schema(as = StationPage)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct StationPageSchema {
    items: Vec<StationSchema>,
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 20)]
    limit: u32,
    /// Matching records before paging.
    total: usize,
}

/// OpenAPI schema for a page of user profiles.
#[derive(ToSchema)]
#[schema(as = UserPage)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserPageSchema {
    items: Vec<UserProfile>,
    #[schema(example = 1)]
    page: u32,
    #[schema(example = 20)]
    limit: u32,
    /// Matching records before paging.
    total: usize,
}
