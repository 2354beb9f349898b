//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every `/api/v1` handler and the health probes.
//! Callers are identified by headers the upstream auth layer sets, so the
//! security schemes describe those headers rather than a login flow.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    BookedMock, Booking, EnrichedMock, Error, ErrorCode, Feedback, FlaggedStation, Mock,
    MockProgress, Role, StationEntry, StationProgress, SupportMessage, Transcript,
    TranscriptMessage, UserProfile,
};
use crate::inbound::http::acting_user::{USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
use crate::inbound::http::bookings::{
    BookingReceiptBody, JoinBookingsRequest, MoveBookingRequest, MoveReceiptBody, ReconcileBody,
    SlotRequest,
};
use crate::inbound::http::evaluations::{FeedbackReceiptBody, FeedbackRequest, TranscriptRequest};
use crate::inbound::http::messages::SupportMessageRequest;
use crate::inbound::http::mocks::MockRequest;
use crate::inbound::http::schemas::{StationPageSchema, StationSchema, UserPageSchema};
use crate::inbound::http::stations::FlagStationRequest;
use crate::inbound::http::users::{CreateUserRequest, UpdateUserRequest};

/// Describe the trusted identity headers.
struct IdentityHeaders;

impl Modify for IdentityHeaders {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        for (name, header, description) in [
            ("UserId", USER_ID_HEADER, "Caller's user id."),
            ("UserEmail", USER_EMAIL_HEADER, "Caller's email; identifies bookings."),
            ("UserRole", USER_ROLE_HEADER, "Set to `admin` for admin operations."),
        ] {
            components.add_security_scheme(
                name,
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                    header,
                    description,
                ))),
            );
        }
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&IdentityHeaders),
    info(
        title = "OSCE mock-exam backend API",
        description = "Slot booking, station catalogue, evaluations and support inbox."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("UserId" = [], "UserEmail" = [])),
    paths(
        crate::inbound::http::bookings::join_bookings,
        crate::inbound::http::bookings::move_booking,
        crate::inbound::http::bookings::cancel_booking,
        crate::inbound::http::bookings::list_bookings,
        crate::inbound::http::bookings::reconcile_bookings,
        crate::inbound::http::stations::list_stations,
        crate::inbound::http::stations::get_station,
        crate::inbound::http::stations::stations_for_mock,
        crate::inbound::http::stations::complete_station,
        crate::inbound::http::stations::flag_station,
        crate::inbound::http::mocks::create_mock,
        crate::inbound::http::mocks::list_mocks,
        crate::inbound::http::mocks::update_mock,
        crate::inbound::http::mocks::delete_mock,
        crate::inbound::http::mocks::complete_mock,
        crate::inbound::http::evaluations::add_transcript,
        crate::inbound::http::evaluations::list_transcripts,
        crate::inbound::http::evaluations::add_feedback,
        crate::inbound::http::evaluations::list_feedbacks,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::messages::create_message,
        crate::inbound::http::messages::list_messages,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Booking,
        BookedMock,
        SlotRequest,
        JoinBookingsRequest,
        MoveBookingRequest,
        BookingReceiptBody,
        MoveReceiptBody,
        ReconcileBody,
        StationSchema,
        StationPageSchema,
        FlagStationRequest,
        Mock,
        MockRequest,
        EnrichedMock,
        StationEntry,
        MockProgress,
        StationProgress,
        FlaggedStation,
        Transcript,
        TranscriptMessage,
        TranscriptRequest,
        Feedback,
        FeedbackRequest,
        FeedbackReceiptBody,
        UserProfile,
        UserPageSchema,
        Role,
        CreateUserRequest,
        UpdateUserRequest,
        SupportMessage,
        SupportMessageRequest,
    )),
    tags(
        (name = "bookings", description = "Slot bookings and the profile mirror"),
        (name = "stations", description = "Station catalogue and per-user progress"),
        (name = "mocks", description = "Mock exams"),
        (name = "evaluations", description = "Transcripts and feedback"),
        (name = "users", description = "User profiles"),
        (name = "support", description = "Support inbox"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
