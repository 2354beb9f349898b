//! Booking API handlers.
//!
//! ```text
//! POST   /api/v1/bookings {"slots":[{"mock_id":"mock-a","datetime":"2025-03-01T09:00"}]}
//! PUT    /api/v1/bookings/{mock_id} {"new_datetime":"2025-03-02T09:00"}
//! DELETE /api/v1/bookings/{mock_id}
//! GET    /api/v1/bookings
//! POST   /api/v1/bookings/reconcile
//! ```
//!
//! The caller's email identifies them in `booked_users`.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{
    BookingReceipt, JoinRequest, MoveReceipt, MoveRequest, ReconcileReport,
};
use crate::domain::{ActingUser, BookedMock, Booking, Error, SlotKey};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, require_slot_datetime, require_text,
};

/// One slot to join.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct SlotRequest {
    #[schema(example = "mock-a")]
    pub mock_id: Option<String>,
    #[schema(example = "2025-03-01T09:00")]
    pub datetime: Option<String>,
    /// Display name copied onto the booking and the caller's profile.
    #[schema(example = "Cardiology mock")]
    pub mock_name: Option<String>,
}

/// Request body for `POST /api/v1/bookings`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct JoinBookingsRequest {
    pub slots: Option<Vec<SlotRequest>>,
}

/// Request body for `PUT /api/v1/bookings/{mock_id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct MoveBookingRequest {
    #[schema(example = "2025-03-02T09:00")]
    pub new_datetime: Option<String>,
    pub mock_name: Option<String>,
}

/// Query for `POST /api/v1/bookings/reconcile`.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ReconcileQuery {
    /// Whose mirror to repair; admins only. Defaults to the caller.
    pub email: Option<String>,
}

/// A committed booking and the caller's matching profile entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingReceiptBody {
    pub booking: Booking,
    pub mirror: BookedMock,
}

/// Where a moved booking came from and where it landed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MoveReceiptBody {
    pub mock_id: String,
    pub from_datetime: String,
    pub booking: Booking,
    pub mirror: BookedMock,
}

/// Entries a reconcile pass changed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReconcileBody {
    pub added: Vec<BookedMock>,
    pub removed: Vec<BookedMock>,
    /// True when the mirror already matched the bookings.
    pub clean: bool,
}

impl From<BookingReceipt> for BookingReceiptBody {
    fn from(receipt: BookingReceipt) -> Self {
        Self {
            booking: receipt.booking,
            mirror: receipt.mirror,
        }
    }
}

impl From<MoveReceipt> for MoveReceiptBody {
    fn from(receipt: MoveReceipt) -> Self {
        Self {
            mock_id: receipt.from.mock_id().to_owned(),
            from_datetime: receipt.from.datetime().to_owned(),
            booking: receipt.to,
            mirror: receipt.mirror,
        }
    }
}

impl From<ReconcileReport> for ReconcileBody {
    fn from(report: ReconcileReport) -> Self {
        let clean = report.is_clean();
        Self {
            added: report.added,
            removed: report.removed,
            clean,
        }
    }
}

fn join_requests(actor: &ActingUser, body: JoinBookingsRequest) -> Result<Vec<JoinRequest>, Error> {
    let slots = body
        .slots
        .filter(|slots| !slots.is_empty())
        .ok_or_else(|| missing_field_error(FieldName::new("slots")))?;
    slots
        .into_iter()
        .map(|slot| {
            let mock_id = require_text(slot.mock_id, FieldName::new("mock_id"))?;
            let datetime = require_slot_datetime(slot.datetime, FieldName::new("datetime"))?;
            Ok(JoinRequest {
                user: actor.email().to_owned(),
                slot: SlotKey::new(mock_id, datetime),
                mock_name: slot.mock_name.unwrap_or_default(),
            })
        })
        .collect()
}

/// Join one or more slots. The batch stops at the first rejected slot.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = JoinBookingsRequest,
    responses(
        (status = 201, description = "Slots joined", body = [BookingReceiptBody]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Missing identity", body = Error),
        (status = 404, description = "Caller has no profile", body = Error),
        (status = 409, description = "Already booked or slot full", body = Error),
        (status = 500, description = "Booking and profile disagree", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "joinBookings"
)]
#[post("/bookings")]
pub async fn join_bookings(
    state: web::Data<HttpState>,
    actor: ActingUser,
    payload: web::Json<JoinBookingsRequest>,
) -> ApiResult<HttpResponse> {
    let requests = join_requests(&actor, payload.into_inner())?;
    let receipts = state.bookings.join(&requests).await?;
    let body: Vec<BookingReceiptBody> = receipts.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Created().json(body))
}

/// Move the caller's booking for a mock to another datetime.
#[utoipa::path(
    put,
    path = "/api/v1/bookings/{mock_id}",
    params(("mock_id" = String, Path, description = "Mock whose booking moves")),
    request_body = MoveBookingRequest,
    responses(
        (status = 200, description = "Booking moved", body = MoveReceiptBody),
        (status = 400, description = "Invalid request or same slot", body = Error),
        (status = 404, description = "No booking for this mock", body = Error),
        (status = 409, description = "Target slot full", body = Error),
        (status = 500, description = "Booking and profile disagree", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "moveBooking"
)]
#[put("/bookings/{mock_id}")]
pub async fn move_booking(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
    payload: web::Json<MoveBookingRequest>,
) -> ApiResult<web::Json<MoveReceiptBody>> {
    let body = payload.into_inner();
    let request = MoveRequest {
        user: actor.email().to_owned(),
        mock_id: path.into_inner(),
        new_datetime: require_slot_datetime(body.new_datetime, FieldName::new("new_datetime"))?,
        mock_name: body.mock_name,
    };
    let receipt = state.bookings.move_booking(&request).await?;
    Ok(web::Json(receipt.into()))
}

/// Cancel the caller's booking for a mock, returning the booking as it was.
#[utoipa::path(
    delete,
    path = "/api/v1/bookings/{mock_id}",
    params(("mock_id" = String, Path, description = "Mock to leave")),
    responses(
        (status = 200, description = "Booking before cancellation", body = Booking),
        (status = 404, description = "No booking for this mock", body = Error),
        (status = 500, description = "Booking and profile disagree", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "cancelBooking"
)]
#[delete("/bookings/{mock_id}")]
pub async fn cancel_booking(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Booking>> {
    let booking = state.bookings.cancel(actor.email(), &path.into_inner()).await?;
    Ok(web::Json(booking))
}

/// Every booking.
#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    responses(
        (status = 200, description = "All bookings", body = [Booking]),
        (status = 401, description = "Missing identity", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "listBookings"
)]
#[get("/bookings")]
pub async fn list_bookings(
    state: web::Data<HttpState>,
    _actor: ActingUser,
) -> ApiResult<web::Json<Vec<Booking>>> {
    Ok(web::Json(state.bookings_query.list().await?))
}

/// Rebuild a profile's booking list from the bookings.
#[utoipa::path(
    post,
    path = "/api/v1/bookings/reconcile",
    params(("email" = Option<String>, Query, description = "Target user; admins only")),
    responses(
        (status = 200, description = "Entries added and removed", body = ReconcileBody),
        (status = 403, description = "Not permitted", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "reconcileBookings"
)]
#[post("/bookings/reconcile")]
pub async fn reconcile_bookings(
    state: web::Data<HttpState>,
    actor: ActingUser,
    query: web::Query<ReconcileQuery>,
) -> ApiResult<web::Json<ReconcileBody>> {
    let target = match query.into_inner().email {
        Some(email) if !email.eq_ignore_ascii_case(actor.email()) => {
            actor.require_admin("reconcile another user's bookings")?;
            email.to_lowercase()
        }
        _ => actor.email().to_owned(),
    };
    let report = state.bookings.reconcile(&target).await?;
    Ok(web::Json(report.into()))
}

#[cfg(test)]
#[path = "bookings_tests.rs"]
mod tests;
