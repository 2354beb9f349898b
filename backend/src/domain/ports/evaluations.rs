//! Driving port for transcripts and feedback.

use async_trait::async_trait;

use crate::domain::{
    ActingUser, Error, EvaluationFilter, Feedback, NewFeedback, NewTranscript, StationProgress,
    Transcript,
};

/// Feedback save outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackReceipt {
    /// Stored feedback.
    pub feedback: Feedback,
    /// Caller's station progress after the save.
    pub station_progress: Vec<StationProgress>,
}

/// Transcript and feedback use-cases.
///
/// Records are always written for the acting user. Queries by non-admins are
/// narrowed to their own records whatever `user_id` they ask for.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Evaluations: Send + Sync {
    /// Store a transcript.
    async fn add_transcript(
        &self,
        actor: &ActingUser,
        transcript: NewTranscript,
    ) -> Result<Transcript, Error>;

    /// Transcripts matching every supplied filter field.
    async fn transcripts(
        &self,
        actor: &ActingUser,
        filter: EvaluationFilter,
    ) -> Result<Vec<Transcript>, Error>;

    /// Store feedback and mark the station completed for the caller.
    ///
    /// # Errors
    ///
    /// `NotFound` when the caller has no user record.
    async fn add_feedback(
        &self,
        actor: &ActingUser,
        feedback: NewFeedback,
    ) -> Result<FeedbackReceipt, Error>;

    /// Feedback matching every supplied filter field.
    async fn feedbacks(
        &self,
        actor: &ActingUser,
        filter: EvaluationFilter,
    ) -> Result<Vec<Feedback>, Error>;
}
