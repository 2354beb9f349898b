//! Transcript and feedback service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde::de::DeserializeOwned;
use tracing::info;
use uuid::Uuid;

use super::user_service::edit_user;
use crate::domain::collection::{Collection, FEEDBACKS, TRANSCRIPTS};
use crate::domain::evaluation::{EvaluationFilter, Feedback, NewFeedback, NewTranscript, Transcript};
use crate::domain::ports::{DocumentStore, Evaluations, FeedbackReceipt};
use crate::domain::record::{from_record, read_list, to_record, write_list};
use crate::domain::record_store::{Mutation, RecordStore, RecordStoreError};
use crate::domain::user_profile::{STATION_PROGRESS_FIELD, StationProgress, upsert_station_progress};
use crate::domain::{ActingUser, Error};

/// [`Evaluations`] over the record store.
pub struct EvaluationService<S> {
    records: RecordStore<S>,
    clock: Arc<dyn Clock>,
}

impl<S> EvaluationService<S> {
    /// Create the service.
    pub fn new(records: RecordStore<S>, clock: Arc<dyn Clock>) -> Self {
        Self { records, clock }
    }

    fn now(&self) -> String {
        self.clock.utc().to_rfc3339()
    }
}

/// Narrow non-admin queries to the caller's own records.
fn scoped(actor: &ActingUser, mut filter: EvaluationFilter) -> EvaluationFilter {
    if !actor.is_admin() {
        filter.user_id = Some(actor.user_id().to_owned());
    }
    filter
}

impl<S: DocumentStore> EvaluationService<S> {
    async fn query<T: DeserializeOwned + Send>(
        &self,
        collection: &Collection,
        filter: &EvaluationFilter,
    ) -> Result<Vec<T>, Error> {
        let records = match self.records.get(collection, &filter.to_filters()).await {
            Ok(records) => records,
            Err(RecordStoreError::NotFound { .. }) => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        records
            .into_iter()
            .map(|record| from_record(record).map_err(Error::from))
            .collect()
    }
}

#[async_trait]
impl<S: DocumentStore> Evaluations for EvaluationService<S> {
    async fn add_transcript(
        &self,
        actor: &ActingUser,
        transcript: NewTranscript,
    ) -> Result<Transcript, Error> {
        let stored = Transcript {
            transcript_id: Uuid::new_v4().to_string(),
            user_id: actor.user_id().to_owned(),
            mock_id: transcript.mock_id,
            station_id: transcript.station_id,
            transcript_message: transcript.transcript_message,
            created_at: self.now(),
        };
        self.records
            .add(&TRANSCRIPTS, to_record(&stored)?, &["transcript_id"])
            .await?;
        info!(transcript_id = %stored.transcript_id, "transcript saved");
        Ok(stored)
    }

    async fn transcripts(
        &self,
        actor: &ActingUser,
        filter: EvaluationFilter,
    ) -> Result<Vec<Transcript>, Error> {
        self.query(&TRANSCRIPTS, &scoped(actor, filter)).await
    }

    async fn add_feedback(
        &self,
        actor: &ActingUser,
        feedback: NewFeedback,
    ) -> Result<FeedbackReceipt, Error> {
        let stored = Feedback {
            feedback_id: format!("feedback_{}", Uuid::new_v4()),
            user_id: actor.user_id().to_owned(),
            mock_id: feedback.mock_id,
            station_id: feedback.station_id,
            evaluated_by: feedback.evaluated_by,
            created_at: self.now(),
            feedback: feedback.feedback,
        };
        self.records
            .add(&FEEDBACKS, to_record(&stored)?, &["feedback_id"])
            .await?;

        let station_id = stored.station_id.as_str();
        let station_progress = edit_user(&self.records, actor.user_id(), |user| {
            let mut progress: Vec<StationProgress> = read_list(user, STATION_PROGRESS_FIELD)?;
            if !upsert_station_progress(&mut progress, station_id) {
                return Ok(Mutation::Skip(progress));
            }
            write_list(user, STATION_PROGRESS_FIELD, &progress)?;
            Ok(Mutation::Write(progress))
        })
        .await?;

        info!(feedback_id = %stored.feedback_id, "feedback saved");
        Ok(FeedbackReceipt {
            feedback: stored,
            station_progress,
        })
    }

    async fn feedbacks(
        &self,
        actor: &ActingUser,
        filter: EvaluationFilter,
    ) -> Result<Vec<Feedback>, Error> {
        self.query(&FEEDBACKS, &scoped(actor, filter)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::USERS;
    use crate::domain::evaluation::TranscriptMessage;
    use crate::domain::{ErrorCode, Role};
    use crate::outbound::persistence::InMemoryDocumentStore;
    use crate::test_support::{fixture_clock, fixture_timestamp, seed};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    async fn service() -> EvaluationService<InMemoryDocumentStore> {
        let store = InMemoryDocumentStore::new();
        seed(
            &store,
            &USERS,
            json!([
                {
                    "user_id": "u1",
                    "email": "u1@example.com",
                    "station_progress": [{ "station_id": "s1", "completed": false }],
                },
                { "user_id": "u2", "email": "u2@example.com" },
            ]),
        )
        .await;
        EvaluationService::new(RecordStore::new(Arc::new(store)), fixture_clock())
    }

    fn user(id: &str) -> ActingUser {
        ActingUser::new(id, format!("{id}@example.com"), Role::User)
    }

    fn transcript(mock_id: &str, station_id: &str) -> NewTranscript {
        NewTranscript {
            mock_id: mock_id.to_owned(),
            station_id: station_id.to_owned(),
            transcript_message: vec![TranscriptMessage {
                role: "user".to_owned(),
                message: "What brings you in today?".to_owned(),
                time_in_call_secs: Some(0),
            }],
        }
    }

    fn feedback(station_id: &str) -> NewFeedback {
        NewFeedback {
            mock_id: "m1".to_owned(),
            station_id: station_id.to_owned(),
            evaluated_by: "evaluator".to_owned(),
            feedback: json!({ "overall": "pass" }),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn transcripts_are_filtered_and_scoped(
        #[future] service: EvaluationService<InMemoryDocumentStore>,
    ) {
        let service = service.await;
        let saved = service
            .add_transcript(&user("u1"), transcript("m1", "s1"))
            .await
            .expect("save");
        assert_eq!(saved.created_at, fixture_timestamp().to_rfc3339());
        service
            .add_transcript(&user("u1"), transcript("m1", "s2"))
            .await
            .expect("save");
        service
            .add_transcript(&user("u2"), transcript("m1", "s1"))
            .await
            .expect("save");

        let by_station = service
            .transcripts(
                &user("u1"),
                EvaluationFilter {
                    station_id: Some("s1".to_owned()),
                    ..EvaluationFilter::default()
                },
            )
            .await
            .expect("query");
        assert_eq!(by_station, vec![saved]);

        let snooping = service
            .transcripts(
                &user("u2"),
                EvaluationFilter {
                    user_id: Some("u1".to_owned()),
                    ..EvaluationFilter::default()
                },
            )
            .await
            .expect("query");
        assert!(snooping.iter().all(|t| t.user_id == "u2"));

        let admin = ActingUser::new("a", "a@example.com", Role::Admin);
        let everything = service
            .transcripts(&admin, EvaluationFilter::default())
            .await
            .expect("query");
        assert_eq!(everything.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn queries_before_any_save_are_empty(
        #[future] service: EvaluationService<InMemoryDocumentStore>,
    ) {
        let found = service
            .await
            .feedbacks(&user("u1"), EvaluationFilter::default())
            .await
            .expect("query");
        assert!(found.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn feedback_upserts_station_progress(
        #[future] service: EvaluationService<InMemoryDocumentStore>,
    ) {
        let service = service.await;
        let first = service
            .add_feedback(&user("u1"), feedback("s1"))
            .await
            .expect("save");
        assert!(first.feedback.feedback_id.starts_with("feedback_"));
        assert_eq!(
            first.station_progress,
            vec![StationProgress {
                station_id: "s1".to_owned(),
                completed: true,
            }]
        );

        let again = service
            .add_feedback(&user("u1"), feedback("s1"))
            .await
            .expect("save");
        assert_eq!(again.station_progress.len(), 1);

        let stored = service
            .feedbacks(&user("u1"), EvaluationFilter::default())
            .await
            .expect("query");
        assert_eq!(stored.len(), 2);
    }

    #[rstest]
    #[tokio::test]
    async fn feedback_for_unknown_users_is_not_found(
        #[future] service: EvaluationService<InMemoryDocumentStore>,
    ) {
        let err = service
            .await
            .add_feedback(&user("ghost"), feedback("s1"))
            .await
            .expect_err("no user record");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
