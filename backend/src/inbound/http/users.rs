//! User profile API handlers.
//!
//! ```text
//! POST   /api/v1/users {"user_id":"u1","email":"a@example.com","name":"Ada"}
//! GET    /api/v1/users?page=1&limit=20
//! GET    /api/v1/users/{user_id}
//! PATCH  /api/v1/users/{user_id} {"has_paid":true}
//! DELETE /api/v1/users/{user_id}
//! ```
//!
//! Callers register their own profile. Listing, patching and deleting
//! profiles are admin operations; a profile can be read by its owner or an
//! admin.

use actix_web::{HttpResponse, delete, get, patch, post, web};
use pagination::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    ActingUser, Error, MockProgress, NewUser, Role, StationProgress, UserPatch, UserProfile,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::UserPageSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, PageQuery, require_text};

/// Request body for `POST /api/v1/users`.
///
/// `user_id` and `email` default to the caller's identity.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateUserRequest {
    #[schema(example = "u-1")]
    pub user_id: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "Ada")]
    pub name: Option<String>,
    /// Only admins may grant `admin`.
    pub role: Option<Role>,
}

/// Request body for `PATCH /api/v1/users/{user_id}`.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateUserRequest {
    /// Replaces the stored list.
    pub mock_progress: Option<Vec<MockProgress>>,
    /// Replaces the stored list.
    pub station_progress: Option<Vec<StationProgress>>,
    pub has_paid: Option<bool>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(value: UpdateUserRequest) -> Self {
        Self {
            mock_progress: value.mock_progress,
            station_progress: value.station_progress,
            has_paid: value.has_paid,
        }
    }
}

fn new_user(actor: &ActingUser, body: CreateUserRequest) -> Result<NewUser, Error> {
    let user_id = body.user_id.or_else(|| Some(actor.user_id().to_owned()));
    let email = body.email.or_else(|| Some(actor.email().to_owned()));
    Ok(NewUser {
        user_id: require_text(user_id, FieldName::new("user_id"))?,
        email: require_text(email, FieldName::new("email"))?,
        name: body
            .name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty()),
        role: body.role,
    })
}

/// Register a profile.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Profile created", body = UserProfile),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Registering someone else", body = Error),
        (status = 409, description = "Id or email taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    actor: ActingUser,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let user = new_user(&actor, payload.into_inner())?;
    let profile = state.users.create_user(&actor, user).await?;
    Ok(HttpResponse::Created().json(profile))
}

/// Page through every profile. Admins only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "A page of profiles", body = UserPageSchema),
        (status = 400, description = "Invalid page parameters", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    actor: ActingUser,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<UserProfile>>> {
    actor.require_admin("list users")?;
    let params = query.into_inner().params()?;
    Ok(web::Json(state.users.list_users(params).await?))
}

/// One profile. Callers may read their own; admins may read any.
#[utoipa::path(
    get,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "The profile", body = UserProfile),
        (status = 403, description = "Someone else's profile", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{user_id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<UserProfile>> {
    let user_id = path.into_inner();
    if user_id != actor.user_id() {
        actor.require_admin("view other users")?;
    }
    Ok(web::Json(state.users.get_user(&user_id).await?))
}

/// Replace progress lists or the payment flag. Admins only.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated profile", body = UserProfile),
        (status = 400, description = "Nothing to update", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[patch("/users/{user_id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
    payload: web::Json<UpdateUserRequest>,
) -> ApiResult<web::Json<UserProfile>> {
    let profile = state
        .users
        .update_user(&actor, &path.into_inner(), payload.into_inner().into())
        .await?;
    Ok(web::Json(profile))
}

/// Remove a profile. Admins only.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{user_id}",
    params(("user_id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Profile deleted"),
        (status = 403, description = "Not an admin", body = Error),
        (status = 404, description = "Unknown user", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{user_id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    actor: ActingUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    state.users.delete_user(&actor, &path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
