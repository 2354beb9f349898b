//! Domain primitives, services and ports.
//!
//! Purpose: hold the record store and everything layered on it. Adapters in
//! `inbound` and `outbound` depend on this module, never the reverse.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - RecordStore: array-backed collections with optimistic concurrency.
//! - BookingCoordinator: slot capacity plus the per-user booking mirror.
//! - CatalogueService, EvaluationService, UserService, SupportService:
//!   the remaining use-cases, each implementing its driving port.

pub mod acting_user;
pub mod booking;
pub mod booking_service;
pub mod catalogue;
pub mod catalogue_service;
pub mod collection;
pub mod error;
pub mod evaluation;
pub mod evaluation_service;
pub mod ports;
pub mod record;
pub mod record_store;
pub mod support_message;
pub mod support_service;
pub mod trace_id;
pub mod user_profile;
pub mod user_service;

pub use self::acting_user::{ActingUser, Role};
pub use self::booking::{BookedMock, Booking, DEFAULT_MAX_USERS, SlotKey, SlotState};
pub use self::booking_service::{BookingCoordinator, BookingError};
pub use self::catalogue::{EnrichedMock, Mock, MockDraft, Station, StationEntry};
pub use self::catalogue_service::CatalogueService;
pub use self::collection::Collection;
pub use self::error::{Error, ErrorCode};
pub use self::evaluation::{
    EvaluationFilter, Feedback, NewFeedback, NewTranscript, Transcript, TranscriptMessage,
};
pub use self::evaluation_service::EvaluationService;
pub use self::record::{Filters, Record};
pub use self::record_store::{
    DEFAULT_MAX_ATTEMPTS, Mutation, MutationError, Presence, RecordStore, RecordStoreError,
    UpsertOutcome,
};
pub use self::support_message::{NewSupportMessage, SupportMessage};
pub use self::support_service::SupportService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user_profile::{
    FlaggedStation, MockProgress, NewUser, StationProgress, UserPatch, UserProfile,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use osce_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
