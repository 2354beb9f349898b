//! Call transcripts and the feedback produced from them.
//!
//! Feedback documents arrive pre-computed; their inner shape belongs to the
//! external evaluator and is stored as given.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use super::record::Filters;

/// One utterance in a recorded station.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TranscriptMessage {
    /// Speaker (`user` for the candidate, otherwise the simulated patient).
    pub role: String,
    /// What was said.
    pub message: String,
    /// Offset into the call, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_in_call_secs: Option<u32>,
}

/// Stored transcript of one station attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transcript {
    /// UUID assigned on save.
    pub transcript_id: String,
    /// Candidate.
    pub user_id: String,
    /// Mock the station ran in.
    pub mock_id: String,
    /// Station attempted.
    pub station_id: String,
    /// Conversation in order.
    pub transcript_message: Vec<TranscriptMessage>,
    /// Save time (RFC 3339).
    pub created_at: String,
}

/// Transcript fields supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranscript {
    /// Mock the station ran in.
    pub mock_id: String,
    /// Station attempted.
    pub station_id: String,
    /// Conversation in order.
    pub transcript_message: Vec<TranscriptMessage>,
}

/// Stored evaluation of one station attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Feedback {
    /// `feedback_<uuid>`.
    pub feedback_id: String,
    /// Candidate.
    pub user_id: String,
    /// Mock the station ran in.
    pub mock_id: String,
    /// Station evaluated.
    pub station_id: String,
    /// Evaluator label.
    pub evaluated_by: String,
    /// Save time (RFC 3339).
    pub created_at: String,
    /// Evaluator output.
    #[schema(value_type = Object)]
    pub feedback: Value,
}

/// Feedback fields supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct NewFeedback {
    /// Mock the station ran in.
    pub mock_id: String,
    /// Station evaluated.
    pub station_id: String,
    /// Evaluator label.
    pub evaluated_by: String,
    /// Evaluator output.
    pub feedback: Value,
}

/// Optional equality filters shared by transcript and feedback queries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EvaluationFilter {
    /// Candidate.
    pub user_id: Option<String>,
    /// Mock.
    pub mock_id: Option<String>,
    /// Station.
    pub station_id: Option<String>,
}

impl EvaluationFilter {
    /// Record-store filters for the supplied fields.
    pub fn to_filters(&self) -> Filters {
        Filters::new()
            .eq_opt("user_id", self.user_id.clone())
            .eq_opt("mock_id", self.mock_id.clone())
            .eq_opt("station_id", self.station_id.clone())
    }
}
