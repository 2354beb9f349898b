//! Catalogue service backing [`CatalogueQuery`] and [`CatalogueCommand`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageParams};
use serde_json::Value;
use tracing::{info, warn};
use uuid::Uuid;

use super::user_service::edit_user;
use crate::domain::catalogue::{EnrichedMock, Mock, MockDraft, Station, enrich};
use crate::domain::collection::{MOCKS, STATIONS};
use crate::domain::ports::{CatalogueCommand, CatalogueQuery, DocumentStore};
use crate::domain::record::{Filters, from_record, read_list, to_record, write_list};
use crate::domain::record_store::{Mutation, RecordStore, RecordStoreError};
use crate::domain::user_profile::{
    FLAGGED_STATIONS_FIELD, FlaggedStation, MOCK_PROGRESS_FIELD, MockProgress,
    STATION_PROGRESS_FIELD, StationProgress,
};
use crate::domain::{ActingUser, Error};

/// Station and mock use-cases over the record store.
pub struct CatalogueService<S> {
    records: RecordStore<S>,
    clock: Arc<dyn Clock>,
}

impl<S> CatalogueService<S> {
    /// Create the service.
    pub fn new(records: RecordStore<S>, clock: Arc<dyn Clock>) -> Self {
        Self { records, clock }
    }

    fn draft_to_mock(&self, mock_id: String, actor: &ActingUser, draft: MockDraft) -> Mock {
        Mock {
            mock_id,
            name: draft.name,
            duration: draft.duration,
            stations: draft.station_ids,
            available_slots: draft.available_slots,
            created_at: self.clock.utc().to_rfc3339(),
            created_by: actor.user_id().to_owned(),
        }
    }
}

impl<S: DocumentStore> CatalogueService<S> {
    /// Stations array, or `None` when it cannot be read.
    async fn stations_for_enrichment(&self) -> Option<Vec<Station>> {
        match self.records.get(&STATIONS, &Filters::new()).await {
            Ok(stations) => Some(stations),
            Err(err) => {
                warn!(error = %err, "stations unavailable; mock stations left unresolved");
                None
            }
        }
    }
}

#[async_trait]
impl<S: DocumentStore> CatalogueQuery for CatalogueService<S> {
    async fn list_stations(&self, params: PageParams) -> Result<Page<Station>, Error> {
        let all = Filters::new();
        let total = self.records.count(&STATIONS, &all).await?;
        let items = self
            .records
            .get_paginated(&STATIONS, &all, params.to_request())
            .await?;
        Ok(Page::new(items, params, total))
    }

    async fn stations_for_mock(&self, mock_id: &str) -> Result<Vec<Station>, Error> {
        Ok(self
            .records
            .get(&STATIONS, &Filters::new().eq("mock_id", mock_id))
            .await?)
    }

    async fn get_station(&self, station_id: &str) -> Result<Station, Error> {
        let found = match self
            .records
            .get(&STATIONS, &Filters::new().eq("station_id", station_id))
            .await
        {
            Ok(stations) => stations.into_iter().next(),
            Err(RecordStoreError::NotFound { .. }) => None,
            Err(err) => return Err(err.into()),
        };
        found.ok_or_else(|| Error::not_found("Station not found"))
    }

    async fn list_mocks(&self) -> Result<Vec<EnrichedMock>, Error> {
        let mocks = match self.records.get(&MOCKS, &Filters::new()).await {
            Ok(records) => records,
            Err(RecordStoreError::NotFound { .. }) => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        let stations = self.stations_for_enrichment().await.unwrap_or_default();
        mocks
            .into_iter()
            .map(|record| -> Result<EnrichedMock, Error> {
                let mock: Mock = from_record(record)?;
                Ok(enrich(mock, &stations))
            })
            .collect()
    }
}

#[async_trait]
impl<S: DocumentStore> CatalogueCommand for CatalogueService<S> {
    async fn create_mock(&self, actor: &ActingUser, draft: MockDraft) -> Result<Mock, Error> {
        actor.require_admin("create mocks")?;
        let mock = self.draft_to_mock(Uuid::new_v4().to_string(), actor, draft);
        self.records
            .add(&MOCKS, to_record(&mock)?, &["mock_id"])
            .await?;
        info!(mock_id = %mock.mock_id, "mock created");
        Ok(mock)
    }

    async fn update_mock(
        &self,
        actor: &ActingUser,
        mock_id: &str,
        draft: MockDraft,
    ) -> Result<Mock, Error> {
        actor.require_admin("update mocks")?;
        let mock = self.draft_to_mock(mock_id.to_owned(), actor, draft);
        let outcome = self
            .records
            .update_or_insert(&MOCKS, to_record(&mock)?, &["mock_id"])
            .await?;
        info!(mock_id, ?outcome, "mock saved");
        Ok(mock)
    }

    async fn delete_mock(&self, actor: &ActingUser, mock_id: &str) -> Result<(), Error> {
        actor.require_admin("delete mocks")?;
        match self
            .records
            .delete(&MOCKS, &["mock_id"], &[Value::from(mock_id)])
            .await
        {
            Ok(_) => {
                info!(mock_id, "mock deleted");
                Ok(())
            }
            Err(RecordStoreError::NotFound { .. }) => Err(Error::not_found("Mock not found")),
            Err(err) => Err(err.into()),
        }
    }

    async fn complete_mock(&self, actor: &ActingUser, mock_id: &str) -> Result<(), Error> {
        edit_user(&self.records, actor.user_id(), |user| {
            let mut progress: Vec<MockProgress> = read_list(user, MOCK_PROGRESS_FIELD)?;
            progress.push(MockProgress {
                mock_id: mock_id.to_owned(),
                completed: true,
            });
            write_list(user, MOCK_PROGRESS_FIELD, &progress)?;
            Ok(Mutation::Write(()))
        })
        .await
    }

    async fn complete_station(&self, actor: &ActingUser, station_id: &str) -> Result<(), Error> {
        edit_user(&self.records, actor.user_id(), |user| {
            let mut progress: Vec<StationProgress> = read_list(user, STATION_PROGRESS_FIELD)?;
            progress.push(StationProgress {
                station_id: station_id.to_owned(),
                completed: true,
            });
            write_list(user, STATION_PROGRESS_FIELD, &progress)?;
            Ok(Mutation::Write(()))
        })
        .await
    }

    async fn flag_station(
        &self,
        actor: &ActingUser,
        station_id: &str,
        mock_id: &str,
    ) -> Result<(), Error> {
        edit_user(&self.records, actor.user_id(), |user| {
            let mut flags: Vec<FlaggedStation> = read_list(user, FLAGGED_STATIONS_FIELD)?;
            if flags.iter().any(|flag| flag.station_id == station_id) {
                return Err(Error::conflict("Station is already flagged")
                    .with_details(serde_json::json!({ "code": "already_flagged" })));
            }
            flags.push(FlaggedStation {
                station_id: station_id.to_owned(),
                mock_id: mock_id.to_owned(),
                flagged: true,
            });
            write_list(user, FLAGGED_STATIONS_FIELD, &flags)?;
            Ok(Mutation::Write(()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Record;
    use crate::domain::collection::USERS;
    use crate::domain::{ErrorCode, Role, StationEntry};
    use crate::outbound::persistence::InMemoryDocumentStore;
    use crate::test_support::{fixture_clock, fixture_timestamp, seed};
    use rstest::{fixture, rstest};
    use serde_json::json;

    struct Harness {
        store: Arc<InMemoryDocumentStore>,
        service: CatalogueService<InMemoryDocumentStore>,
    }

    impl Harness {
        async fn user(&self, user_id: &str) -> Record {
            RecordStore::new(Arc::clone(&self.store))
                .get(&USERS, &Filters::new().eq("user_id", user_id))
                .await
                .expect("users")
                .into_iter()
                .next()
                .expect("user exists")
        }
    }

    #[fixture]
    async fn harness() -> Harness {
        let store = InMemoryDocumentStore::new();
        seed(
            &store,
            &STATIONS,
            json!([
                { "station_id": "s1", "station_name": "Chest pain", "mock_id": "m1" },
                { "station_id": "s2", "station_name": "Headache", "mock_id": "m1" },
                { "station_id": "s3", "station_name": "Back pain", "mock_id": "m2" },
            ]),
        )
        .await;
        seed(&store, &USERS, json!([{ "user_id": "u1", "email": "u1@example.com" }])).await;
        let store = Arc::new(store);
        Harness {
            service: CatalogueService::new(RecordStore::new(Arc::clone(&store)), fixture_clock()),
            store,
        }
    }

    fn admin() -> ActingUser {
        ActingUser::new("admin-1", "admin@example.com", Role::Admin)
    }

    fn student() -> ActingUser {
        ActingUser::new("u1", "u1@example.com", Role::User)
    }

    fn draft(stations: &[&str]) -> MockDraft {
        MockDraft {
            name: "Cardiology".to_owned(),
            duration: 30,
            station_ids: stations.iter().map(|s| (*s).to_owned()).collect(),
            available_slots: vec!["2025-03-01T09:00".to_owned()],
        }
    }

    #[rstest]
    #[case(1, 2, vec!["s1", "s2"])]
    #[case(2, 2, vec!["s3"])]
    #[case(3, 2, vec![])]
    #[tokio::test]
    async fn stations_are_paged_with_a_total(
        #[future] harness: Harness,
        #[case] page: u32,
        #[case] limit: u32,
        #[case] expected: Vec<&str>,
    ) {
        let harness = harness.await;
        let params = PageParams::from_query(Some(page), Some(limit)).expect("params");
        let listed = harness.service.list_stations(params).await.expect("page");

        assert_eq!(listed.total, 3);
        assert_eq!(listed.page, page);
        let ids: Vec<&str> = listed
            .items
            .iter()
            .filter_map(|station| station.get("station_id").and_then(Value::as_str))
            .collect();
        assert_eq!(ids, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn station_lookups(#[future] harness: Harness) {
        let harness = harness.await;
        let station = harness.service.get_station("s2").await.expect("found");
        assert_eq!(station.get("station_name"), Some(&json!("Headache")));

        let err = harness.service.get_station("nope").await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);

        let for_mock = harness.service.stations_for_mock("m1").await.expect("by mock");
        assert_eq!(for_mock.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn mocks_list_empty_before_creation(#[future] harness: Harness) {
        assert!(harness.await.service.list_mocks().await.expect("list").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn created_mocks_are_listed_with_resolved_stations(#[future] harness: Harness) {
        let harness = harness.await;
        let created = harness
            .service
            .create_mock(&admin(), draft(&["s1", "ghost"]))
            .await
            .expect("create");
        assert!(Uuid::parse_str(&created.mock_id).is_ok());
        assert_eq!(created.created_by, "admin-1");
        assert_eq!(created.created_at, fixture_timestamp().to_rfc3339());

        let mocks = harness.service.list_mocks().await.expect("list");
        assert_eq!(mocks.len(), 1);
        assert!(mocks[0].stations[0].is_found());
        assert_eq!(mocks[0].stations[1], StationEntry::missing());
    }

    #[rstest]
    #[tokio::test]
    async fn mock_writes_require_an_admin(#[future] harness: Harness) {
        let harness = harness.await;
        let err = harness
            .service
            .create_mock(&student(), draft(&["s1"]))
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);

        let err = harness
            .service
            .delete_mock(&student(), "m1")
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[rstest]
    #[tokio::test]
    async fn update_upserts_by_mock_id(#[future] harness: Harness) {
        let harness = harness.await;
        harness
            .service
            .update_mock(&admin(), "m1", draft(&["s1"]))
            .await
            .expect("insert");
        let mut renamed = draft(&["s1", "s2"]);
        renamed.name = "Neurology".to_owned();
        harness
            .service
            .update_mock(&admin(), "m1", renamed)
            .await
            .expect("update");

        let mocks = harness.service.list_mocks().await.expect("list");
        assert_eq!(mocks.len(), 1);
        assert_eq!(mocks[0].name, "Neurology");
        assert_eq!(mocks[0].stations.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_unknown_mocks_is_not_found(#[future] harness: Harness) {
        let harness = harness.await;
        let err = harness
            .service
            .delete_mock(&admin(), "m-missing")
            .await
            .expect_err("nothing to delete");
        assert_eq!(err.code(), ErrorCode::NotFound);

        harness
            .service
            .update_mock(&admin(), "m1", draft(&["s1"]))
            .await
            .expect("insert");
        harness.service.delete_mock(&admin(), "m1").await.expect("delete");
        assert!(harness.service.list_mocks().await.expect("list").is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn progress_is_appended_to_the_callers_record(#[future] harness: Harness) {
        let harness = harness.await;
        harness.service.complete_mock(&student(), "m1").await.expect("mock");
        harness.service.complete_station(&student(), "s1").await.expect("station");

        let user = harness.user("u1").await;
        assert_eq!(user["mock_progress"], json!([{ "mock_id": "m1", "completed": true }]));
        assert_eq!(
            user["station_progress"],
            json!([{ "station_id": "s1", "completed": true }])
        );
        assert_eq!(user["email"], json!("u1@example.com"));
    }

    #[rstest]
    #[tokio::test]
    async fn flagging_twice_conflicts(#[future] harness: Harness) {
        let harness = harness.await;
        harness
            .service
            .flag_station(&student(), "s1", "m1")
            .await
            .expect("flag");
        let err = harness
            .service
            .flag_station(&student(), "s1", "m2")
            .await
            .expect_err("already flagged");
        assert_eq!(err.code(), ErrorCode::Conflict);

        let user = harness.user("u1").await;
        assert_eq!(
            user["flagged_stations"],
            json!([{ "station_id": "s1", "mock_id": "m1", "flagged": true }])
        );
    }

    #[rstest]
    #[tokio::test]
    async fn progress_for_unknown_users_is_not_found(#[future] harness: Harness) {
        let harness = harness.await;
        let stranger = ActingUser::new("nobody", "nobody@example.com", Role::User);
        let err = harness
            .service
            .complete_station(&stranger, "s1")
            .await
            .expect_err("no record");
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.message(), "User not found");
    }
}
