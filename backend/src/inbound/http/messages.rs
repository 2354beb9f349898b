//! Support inbox API handlers.
//!
//! ```text
//! POST /api/v1/messages {"subject":"Refund","message":"...","email":"me@example.com"}
//! GET  /api/v1/messages
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ActingUser, Error, NewSupportMessage, SupportMessage};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_text};

/// Request body for `POST /api/v1/messages`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct SupportMessageRequest {
    #[schema(example = "Booking question")]
    pub subject: Option<String>,
    pub message: Option<String>,
    /// Reply-to address; the caller's email when omitted.
    pub email: Option<String>,
}

impl TryFrom<SupportMessageRequest> for NewSupportMessage {
    type Error = Error;

    fn try_from(value: SupportMessageRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            subject: require_text(value.subject, FieldName::new("subject"))?,
            message: require_text(value.message, FieldName::new("message"))?,
            email: value
                .email
                .map(|email| email.trim().to_lowercase())
                .filter(|email| !email.is_empty()),
        })
    }
}

/// Send a message to the support team.
#[utoipa::path(
    post,
    path = "/api/v1/messages",
    request_body = SupportMessageRequest,
    responses(
        (status = 201, description = "Message stored", body = SupportMessage),
        (status = 400, description = "Invalid request", body = Error)
    ),
    tags = ["support"],
    operation_id = "createMessage"
)]
#[post("/messages")]
pub async fn create_message(
    state: web::Data<HttpState>,
    actor: ActingUser,
    payload: web::Json<SupportMessageRequest>,
) -> ApiResult<HttpResponse> {
    let message = NewSupportMessage::try_from(payload.into_inner())?;
    let stored = state.messages.create(&actor, message).await?;
    Ok(HttpResponse::Created().json(stored))
}

/// Messages the caller has sent.
#[utoipa::path(
    get,
    path = "/api/v1/messages",
    responses(
        (status = 200, description = "Caller's messages", body = [SupportMessage])
    ),
    tags = ["support"],
    operation_id = "listMessages"
)]
#[get("/messages")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    actor: ActingUser,
) -> ApiResult<web::Json<Vec<SupportMessage>>> {
    Ok(web::Json(state.messages.list_own(&actor).await?))
}
