//! Station API handlers.
//!
//! ```text
//! GET  /api/v1/stations?page=1&limit=20
//! GET  /api/v1/stations/{station_id}
//! GET  /api/v1/mocks/{mock_id}/stations
//! POST /api/v1/stations/{station_id}/complete
//! POST /api/v1/stations/{station_id}/flag {"mock_id":"mock-a"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ActingUser, Error, FlaggedStation, Station, StationProgress};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{StationPageSchema, StationSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, require_text};

/// Request body for flagging a station.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct FlagStationRequest {
    /// Mock in which the station was flagged.
    #[schema(example = "mock-a")]
    pub mock_id: Option<String>,
}

/// Page through every station.
#[utoipa::path(
    get,
    path = "/api/v1/stations",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of stations", body = StationPageSchema),
        (status = 400, description = "Invalid page parameters", body = Error)
    ),
    tags = ["stations"],
    operation_id = "listStations"
)]
#[get("/stations")]
pub async fn list_stations(
    state: web::Data<HttpState>,
    _actor: ActingUser,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<Station>>> {
    let params = query.into_inner().params()?;
    Ok(web::Json(state.catalogue_query.list_stations(params).await?))
}

/// One station by id.
#[utoipa::path(
    get,
    path = "/api/v1/stations/{station_id}",
    params(("station_id" = String, Path, description = "Station identifier")),
    responses(
        (status = 200, description = "The station", body = StationSchema),
        (status = 404, description = "Unknown station", body = Error)
    ),
    tags = ["stations"],
    operation_id = "getStation"
)]
#[get("/stations/{station_id}")]
pub async fn get_station(
    state: web::Data<HttpState>,
    _actor: ActingUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Station>> {
    Ok(web::Json(
        state.catalogue_query.get_station(&path.into_inner()).await?,
    ))
}

/// Stations belonging to a mock.
#[utoipa::path(
    get,
    path = "/api/v1/mocks/{mock_id}/stations",
    params(("mock_id" = String, Path, description = "Mock identifier")),
    responses(
        (status = 200, description = "The mock's stations", body = [StationSchema]),
        (status = 404, description = "No stations stored yet", body = Error)
    ),
    tags = ["stations"],
    operation_id = "stationsForMock"
)]
#[get("/mocks/{mock_id}/stations")]
pub async fn stations_for_mock(
    state: web::Data<HttpState>,
    _actor: ActingUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Station>>> {
    Ok(web::Json(
        state
            .catalogue_query
            .stations_for_mock(&path.into_inner())
            .await?,
    ))
}

/// Record the station as completed on the caller's profile.
#[utoipa::path(
    post,
    path = "/api/v1/stations/{station_id}/complete",
    params(("station_id" = String, Path, description = "Station identifier")),
    responses(
        (status = 200, description = "Progress entry recorded", body = StationProgress),
        (status = 404, description = "Caller has no profile", body = Error)
    ),
    tags = ["stations"],
    operation_id = "completeStation"
)]
#[post("/stations/{station_id}/complete")]
pub async fn complete_station(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<StationProgress>> {
    let station_id = path.into_inner();
    state.catalogue.complete_station(&actor, &station_id).await?;
    Ok(web::Json(StationProgress {
        station_id,
        completed: true,
    }))
}

/// Flag a station for later review.
#[utoipa::path(
    post,
    path = "/api/v1/stations/{station_id}/flag",
    params(("station_id" = String, Path, description = "Station identifier")),
    request_body = FlagStationRequest,
    responses(
        (status = 201, description = "Station flagged", body = FlaggedStation),
        (status = 400, description = "Missing mock id", body = Error),
        (status = 409, description = "Already flagged", body = Error)
    ),
    tags = ["stations"],
    operation_id = "flagStation"
)]
#[post("/stations/{station_id}/flag")]
pub async fn flag_station(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
    payload: web::Json<FlagStationRequest>,
) -> ApiResult<HttpResponse> {
    let station_id = path.into_inner();
    let mock_id = require_text(payload.into_inner().mock_id, FieldName::new("mock_id"))?;
    state
        .catalogue
        .flag_station(&actor, &station_id, &mock_id)
        .await?;
    Ok(HttpResponse::Created().json(FlaggedStation {
        station_id,
        mock_id,
        flagged: true,
    }))
}
