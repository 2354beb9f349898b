//! Mock API handlers.
//!
//! ```text
//! POST   /api/v1/mocks {"name":"Cardiology","duration":60,"stations":["s1","s2"]}
//! GET    /api/v1/mocks
//! PUT    /api/v1/mocks/{mock_id}
//! DELETE /api/v1/mocks/{mock_id}
//! POST   /api/v1/mocks/{mock_id}/complete
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ActingUser, EnrichedMock, Error, Mock, MockDraft, MockProgress};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, require_positive, require_slot_datetime, require_text, require_text_list,
};

/// Request body for creating or replacing a mock.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct MockRequest {
    #[schema(example = "Cardiology")]
    pub name: Option<String>,
    /// Minutes.
    #[schema(example = 60)]
    pub duration: Option<u32>,
    /// Station ids, in running order.
    pub stations: Option<Vec<String>>,
    /// Bookable slot datetimes.
    #[serde(default)]
    pub available_slots: Vec<String>,
}

impl TryFrom<MockRequest> for MockDraft {
    type Error = Error;

    fn try_from(value: MockRequest) -> Result<Self, Self::Error> {
        let available_slots = value
            .available_slots
            .into_iter()
            .map(|slot| require_slot_datetime(Some(slot), FieldName::new("available_slots")))
            .collect::<Result<_, _>>()?;
        Ok(Self {
            name: require_text(value.name, FieldName::new("name"))?,
            duration: require_positive(value.duration, FieldName::new("duration"))?,
            station_ids: require_text_list(value.stations, FieldName::new("stations"))?,
            available_slots,
        })
    }
}

/// Create a mock. Admins only.
#[utoipa::path(
    post,
    path = "/api/v1/mocks",
    request_body = MockRequest,
    responses(
        (status = 201, description = "Mock created", body = Mock),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["mocks"],
    operation_id = "createMock"
)]
#[post("/mocks")]
pub async fn create_mock(
    state: web::Data<HttpState>,
    actor: ActingUser,
    payload: web::Json<MockRequest>,
) -> ApiResult<HttpResponse> {
    let draft = MockDraft::try_from(payload.into_inner())?;
    let mock = state.catalogue.create_mock(&actor, draft).await?;
    Ok(HttpResponse::Created().json(mock))
}

/// Every mock with its stations resolved in place.
///
/// Stations that cannot be resolved appear as `{"error": "Station not found."}`.
#[utoipa::path(
    get,
    path = "/api/v1/mocks",
    responses(
        (status = 200, description = "Mocks with stations", body = [EnrichedMock])
    ),
    tags = ["mocks"],
    operation_id = "listMocks"
)]
#[get("/mocks")]
pub async fn list_mocks(
    state: web::Data<HttpState>,
    _actor: ActingUser,
) -> ApiResult<web::Json<Vec<EnrichedMock>>> {
    Ok(web::Json(state.catalogue_query.list_mocks().await?))
}

/// Replace a mock's fields, creating it when absent. Admins only.
#[utoipa::path(
    put,
    path = "/api/v1/mocks/{mock_id}",
    params(("mock_id" = String, Path, description = "Mock identifier")),
    request_body = MockRequest,
    responses(
        (status = 200, description = "Mock stored", body = Mock),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["mocks"],
    operation_id = "updateMock"
)]
#[put("/mocks/{mock_id}")]
pub async fn update_mock(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
    payload: web::Json<MockRequest>,
) -> ApiResult<web::Json<Mock>> {
    let draft = MockDraft::try_from(payload.into_inner())?;
    let mock = state
        .catalogue
        .update_mock(&actor, &path.into_inner(), draft)
        .await?;
    Ok(web::Json(mock))
}

/// Delete a mock. Admins only.
#[utoipa::path(
    delete,
    path = "/api/v1/mocks/{mock_id}",
    params(("mock_id" = String, Path, description = "Mock identifier")),
    responses(
        (status = 204, description = "Mock deleted"),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown mock", body = Error)
    ),
    tags = ["mocks"],
    operation_id = "deleteMock"
)]
#[delete("/mocks/{mock_id}")]
pub async fn delete_mock(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state
        .catalogue
        .delete_mock(&actor, &path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Record the mock as completed on the caller's profile.
#[utoipa::path(
    post,
    path = "/api/v1/mocks/{mock_id}/complete",
    params(("mock_id" = String, Path, description = "Mock identifier")),
    responses(
        (status = 200, description = "Progress entry recorded", body = MockProgress),
        (status = 404, description = "Caller has no profile", body = Error)
    ),
    tags = ["mocks"],
    operation_id = "completeMock"
)]
#[post("/mocks/{mock_id}/complete")]
pub async fn complete_mock(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<MockProgress>> {
    let mock_id = path.into_inner();
    state.catalogue.complete_mock(&actor, &mock_id).await?;
    Ok(web::Json(MockProgress {
        mock_id,
        completed: true,
    }))
}
