//! Acting-user extraction from trusted identity headers.
//!
//! An upstream authentication layer verifies the caller and forwards
//! `X-User-Id`, `X-User-Email` and optionally `X-User-Role`. Handlers take
//! [`ActingUser`] as an argument; a request without identity is rejected
//! with 401 before the handler runs.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use serde_json::json;

use crate::domain::{ActingUser, Error, Role};
use crate::inbound::http::state::HttpState;

/// Header carrying the caller's user id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the caller's email.
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Header carrying the caller's role (`user` or `admin`).
pub const USER_ROLE_HEADER: &str = "x-user-role";

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

fn missing_identity(header: &str) -> Error {
    Error::unauthorized("Missing caller identity")
        .with_details(json!({ "code": "missing_identity", "header": header }))
}

fn acting_user(req: &HttpRequest) -> Result<ActingUser, Error> {
    let user_id = header(req, USER_ID_HEADER).ok_or_else(|| missing_identity(USER_ID_HEADER))?;
    let email = header(req, USER_EMAIL_HEADER)
        .ok_or_else(|| missing_identity(USER_EMAIL_HEADER))?
        .to_lowercase();
    let listed = req
        .app_data::<web::Data<HttpState>>()
        .is_some_and(|state| state.is_admin_email(&email));
    let role = match header(req, USER_ROLE_HEADER).map(Role::parse) {
        Some(Role::Admin) => Role::Admin,
        _ if listed => Role::Admin,
        _ => Role::User,
    };
    Ok(ActingUser::new(user_id, email, role))
}

impl FromRequest for ActingUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(acting_user(req).map_err(actix_web::Error::from))
    }
}
