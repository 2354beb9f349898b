//! Driving ports for stations and mocks.

use async_trait::async_trait;
use pagination::{Page, PageParams};

use crate::domain::{ActingUser, EnrichedMock, Error, Mock, MockDraft, Station};

/// Read-side catalogue use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// One page of stations in stored order, with the overall total.
    async fn list_stations(&self, params: PageParams) -> Result<Page<Station>, Error>;

    /// Stations whose `mock_id` equals `mock_id`.
    async fn stations_for_mock(&self, mock_id: &str) -> Result<Vec<Station>, Error>;

    /// A single station.
    ///
    /// # Errors
    ///
    /// `NotFound` when no station has this id.
    async fn get_station(&self, station_id: &str) -> Result<Station, Error>;

    /// Every mock with its station ids resolved.
    async fn list_mocks(&self) -> Result<Vec<EnrichedMock>, Error>;
}

/// Write-side catalogue use-cases.
///
/// Mock creation, update and deletion require an admin; progress and flag
/// operations apply to the acting user's own record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Create a mock with a fresh id.
    async fn create_mock(&self, actor: &ActingUser, draft: MockDraft) -> Result<Mock, Error>;

    /// Replace the mock's fields, creating it when absent.
    async fn update_mock(
        &self,
        actor: &ActingUser,
        mock_id: &str,
        draft: MockDraft,
    ) -> Result<Mock, Error>;

    /// Remove a mock.
    ///
    /// # Errors
    ///
    /// `NotFound` when no mock has this id.
    async fn delete_mock(&self, actor: &ActingUser, mock_id: &str) -> Result<(), Error>;

    /// Record that the caller completed a mock.
    async fn complete_mock(&self, actor: &ActingUser, mock_id: &str) -> Result<(), Error>;

    /// Record that the caller completed a station.
    async fn complete_station(&self, actor: &ActingUser, station_id: &str) -> Result<(), Error>;

    /// Flag a station met in `mock_id` for review.
    ///
    /// # Errors
    ///
    /// `Conflict` when the caller already flagged the station.
    async fn flag_station(
        &self,
        actor: &ActingUser,
        station_id: &str,
        mock_id: &str,
    ) -> Result<(), Error>;
}
