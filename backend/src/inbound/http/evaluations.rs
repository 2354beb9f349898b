//! Transcript and feedback API handlers.
//!
//! ```text
//! POST /api/v1/transcripts {"mock_id":"m1","station_id":"s1","transcript_message":[...]}
//! GET  /api/v1/transcripts?mock_id=m1
//! POST /api/v1/feedbacks {"mock_id":"m1","station_id":"s1","evaluated_by":"gpt","feedback":{...}}
//! GET  /api/v1/feedbacks?station_id=s1
//! ```
//!
//! Records are written for the caller. Non-admin queries only ever see the
//! caller's own records.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::domain::ports::FeedbackReceipt;
use crate::domain::{
    ActingUser, Error, EvaluationFilter, Feedback, NewFeedback, NewTranscript, StationProgress,
    Transcript, TranscriptMessage,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, require_text};

/// Request body for `POST /api/v1/transcripts`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct TranscriptRequest {
    pub mock_id: Option<String>,
    pub station_id: Option<String>,
    pub transcript_message: Option<Vec<TranscriptMessage>>,
}

impl TryFrom<TranscriptRequest> for NewTranscript {
    type Error = Error;

    fn try_from(value: TranscriptRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            mock_id: require_text(value.mock_id, FieldName::new("mock_id"))?,
            station_id: require_text(value.station_id, FieldName::new("station_id"))?,
            transcript_message: value
                .transcript_message
                .ok_or_else(|| missing_field_error(FieldName::new("transcript_message")))?,
        })
    }
}

/// Request body for `POST /api/v1/feedbacks`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct FeedbackRequest {
    pub mock_id: Option<String>,
    pub station_id: Option<String>,
    /// Label of the evaluator that produced the feedback.
    #[schema(example = "gpt-4o")]
    pub evaluated_by: Option<String>,
    /// Evaluator output, stored as given.
    #[schema(value_type = Object)]
    pub feedback: Option<Value>,
}

impl TryFrom<FeedbackRequest> for NewFeedback {
    type Error = Error;

    fn try_from(value: FeedbackRequest) -> Result<Self, Self::Error> {
        let feedback = value
            .feedback
            .filter(|feedback| !feedback.is_null())
            .ok_or_else(|| missing_field_error(FieldName::new("feedback")))?;
        Ok(Self {
            mock_id: require_text(value.mock_id, FieldName::new("mock_id"))?,
            station_id: require_text(value.station_id, FieldName::new("station_id"))?,
            evaluated_by: require_text(value.evaluated_by, FieldName::new("evaluated_by"))?,
            feedback,
        })
    }
}

/// Stored feedback with the caller's station progress after the save.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackReceiptBody {
    pub feedback: Feedback,
    pub station_progress: Vec<StationProgress>,
}

impl From<FeedbackReceipt> for FeedbackReceiptBody {
    fn from(receipt: FeedbackReceipt) -> Self {
        Self {
            feedback: receipt.feedback,
            station_progress: receipt.station_progress,
        }
    }
}

/// Store a transcript for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/transcripts",
    request_body = TranscriptRequest,
    responses(
        (status = 201, description = "Transcript stored", body = Transcript),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["evaluations"],
    operation_id = "addTranscript"
)]
#[post("/transcripts")]
pub async fn add_transcript(
    state: web::Data<HttpState>,
    actor: ActingUser,
    payload: web::Json<TranscriptRequest>,
) -> ApiResult<HttpResponse> {
    let transcript = NewTranscript::try_from(payload.into_inner())?;
    let stored = state.evaluations.add_transcript(&actor, transcript).await?;
    Ok(HttpResponse::Created().json(stored))
}

/// Transcripts matching every supplied filter.
#[utoipa::path(
    get,
    path = "/api/v1/transcripts",
    params(
        ("user_id" = Option<String>, Query, description = "Candidate; ignored for non-admins"),
        ("mock_id" = Option<String>, Query, description = "Mock"),
        ("station_id" = Option<String>, Query, description = "Station")
    ),
    responses(
        (status = 200, description = "Matching transcripts", body = [Transcript])
    ),
    tags = ["evaluations"],
    operation_id = "listTranscripts"
)]
#[get("/transcripts")]
pub async fn list_transcripts(
    state: web::Data<HttpState>,
    actor: ActingUser,
    query: web::Query<EvaluationFilter>,
) -> ApiResult<web::Json<Vec<Transcript>>> {
    Ok(web::Json(
        state
            .evaluations
            .transcripts(&actor, query.into_inner())
            .await?,
    ))
}

/// Store feedback and mark the station completed for the caller.
#[utoipa::path(
    post,
    path = "/api/v1/feedbacks",
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback stored", body = FeedbackReceiptBody),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Caller has no profile", body = Error)
    ),
    tags = ["evaluations"],
    operation_id = "addFeedback"
)]
#[post("/feedbacks")]
pub async fn add_feedback(
    state: web::Data<HttpState>,
    actor: ActingUser,
    payload: web::Json<FeedbackRequest>,
) -> ApiResult<HttpResponse> {
    let feedback = NewFeedback::try_from(payload.into_inner())?;
    let receipt = state.evaluations.add_feedback(&actor, feedback).await?;
    Ok(HttpResponse::Created().json(FeedbackReceiptBody::from(receipt)))
}

/// Feedback matching every supplied filter.
#[utoipa::path(
    get,
    path = "/api/v1/feedbacks",
    params(
        ("user_id" = Option<String>, Query, description = "Candidate; ignored for non-admins"),
        ("mock_id" = Option<String>, Query, description = "Mock"),
        ("station_id" = Option<String>, Query, description = "Station")
    ),
    responses(
        (status = 200, description = "Matching feedback", body = [Feedback])
    ),
    tags = ["evaluations"],
    operation_id = "listFeedbacks"
)]
#[get("/feedbacks")]
pub async fn list_feedbacks(
    state: web::Data<HttpState>,
    actor: ActingUser,
    query: web::Query<EvaluationFilter>,
) -> ApiResult<web::Json<Vec<Feedback>>> {
    Ok(web::Json(
        state
            .evaluations
            .feedbacks(&actor, query.into_inner())
            .await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::collection::USERS;
    use crate::inbound::http::test_utils::{
        StatePorts, admin_identity, identity, in_memory_state, test_app,
    };
    use crate::outbound::persistence::InMemoryDocumentStore;
    use crate::test_support::seed;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;
    use std::sync::Arc;

    fn feedback_request() -> FeedbackRequest {
        FeedbackRequest {
            mock_id: Some("m1".to_owned()),
            station_id: Some("s1".to_owned()),
            evaluated_by: Some("gpt-4o".to_owned()),
            feedback: Some(json!({"score": 7})),
        }
    }

    fn transcript_request() -> TranscriptRequest {
        TranscriptRequest {
            mock_id: Some("m1".to_owned()),
            station_id: Some("s1".to_owned()),
            transcript_message: Some(vec![TranscriptMessage {
                role: "user".to_owned(),
                message: "Hello, what brings you in today?".to_owned(),
                time_in_call_secs: Some(3),
            }]),
        }
    }

    #[rstest]
    #[actix_web::test]
    async fn feedback_marks_the_station_complete() {
        let store = InMemoryDocumentStore::new();
        seed(&store, &USERS, json!([{"user_id": "u1", "email": "u1@example.com"}])).await;
        let app = test::init_service(test_app(in_memory_state(Arc::new(store)))).await;

        let mut save = test::TestRequest::post()
            .uri("/api/v1/feedbacks")
            .set_json(feedback_request());
        for header in identity("u1", "u1@example.com") {
            save = save.insert_header(header);
        }
        let response = test::call_service(&app, save.to_request()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let receipt: FeedbackReceiptBody = test::read_body_json(response).await;
        assert_eq!(receipt.feedback.user_id, "u1");
        assert!(receipt.feedback.feedback_id.starts_with("feedback_"));
        assert_eq!(
            receipt.station_progress,
            vec![StationProgress {
                station_id: "s1".to_owned(),
                completed: true,
            }]
        );

        let mut list = test::TestRequest::get().uri("/api/v1/feedbacks?station_id=s1");
        for header in identity("u1", "u1@example.com") {
            list = list.insert_header(header);
        }
        let found: Vec<Feedback> = test::call_and_read_body_json(&app, list.to_request()).await;
        assert_eq!(found.len(), 1);
    }

    #[rstest]
    #[actix_web::test]
    async fn transcripts_are_created_for_the_caller() {
        let mut ports = StatePorts::default();
        ports
            .evaluations
            .expect_add_transcript()
            .withf(|actor, transcript| {
                actor.user_id() == "u1" && transcript.transcript_message.len() == 1
            })
            .times(1)
            .returning(|actor, transcript| {
                Ok(Transcript {
                    transcript_id: "t1".to_owned(),
                    user_id: actor.user_id().to_owned(),
                    mock_id: transcript.mock_id,
                    station_id: transcript.station_id,
                    transcript_message: transcript.transcript_message,
                    created_at: "2025-03-01T08:15:00+00:00".to_owned(),
                })
            });
        let app = test::init_service(test_app(ports.into_state())).await;
        let mut save = test::TestRequest::post()
            .uri("/api/v1/transcripts")
            .set_json(transcript_request());
        for header in identity("u1", "u1@example.com") {
            save = save.insert_header(header);
        }
        let response = test::call_service(&app, save.to_request()).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[rstest]
    #[case(FeedbackRequest { evaluated_by: None, ..feedback_request() }, "evaluated_by")]
    #[case(FeedbackRequest { feedback: Some(Value::Null), ..feedback_request() }, "feedback")]
    #[case(FeedbackRequest { station_id: Some("  ".to_owned()), ..feedback_request() }, "station_id")]
    #[actix_web::test]
    async fn incomplete_feedback_is_rejected(
        #[case] payload: FeedbackRequest,
        #[case] field: &str,
    ) {
        let app = test::init_service(test_app(StatePorts::default().into_state())).await;
        let mut save = test::TestRequest::post()
            .uri("/api/v1/feedbacks")
            .set_json(payload);
        for header in identity("u1", "u1@example.com") {
            save = save.insert_header(header);
        }
        let response = test::call_service(&app, save.to_request()).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[rstest]
    #[actix_web::test]
    async fn query_filters_reach_the_port() {
        let mut ports = StatePorts::default();
        ports
            .evaluations
            .expect_transcripts()
            .withf(|actor, filter| {
                actor.is_admin()
                    && filter.user_id.as_deref() == Some("u2")
                    && filter.mock_id.as_deref() == Some("m1")
                    && filter.station_id.is_none()
            })
            .times(1)
            .returning(|_, _| Ok(Vec::new()));
        let app = test::init_service(test_app(ports.into_state())).await;
        let mut list = test::TestRequest::get().uri("/api/v1/transcripts?user_id=u2&mock_id=m1");
        for header in admin_identity() {
            list = list.insert_header(header);
        }
        let found: Vec<Transcript> = test::call_and_read_body_json(&app, list.to_request()).await;
        assert!(found.is_empty());
    }
}
