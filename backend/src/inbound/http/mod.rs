//! HTTP inbound adapter exposing the REST API under `/api/v1`.

pub mod acting_user;
pub mod bookings;
pub mod error;
pub mod evaluations;
pub mod health;
pub mod messages;
pub mod mocks;
pub mod schemas;
pub mod state;
pub mod stations;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod users;
pub(crate) mod validation;

use actix_web::{Scope, web};

pub use crate::domain::ApiResult;
use error::{json_error_handler, query_error_handler};

/// Every `/api/v1` route with JSON and query errors mapped to the domain
/// error payload.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use osce_backend::inbound::http::api_scope;
///
/// let app = App::new().service(api_scope());
/// ```
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(bookings::reconcile_bookings)
        .service(bookings::join_bookings)
        .service(bookings::list_bookings)
        .service(bookings::move_booking)
        .service(bookings::cancel_booking)
        .service(stations::list_stations)
        .service(stations::get_station)
        .service(stations::complete_station)
        .service(stations::flag_station)
        .service(stations::stations_for_mock)
        .service(mocks::create_mock)
        .service(mocks::list_mocks)
        .service(mocks::update_mock)
        .service(mocks::delete_mock)
        .service(mocks::complete_mock)
        .service(evaluations::add_transcript)
        .service(evaluations::list_transcripts)
        .service(evaluations::add_feedback)
        .service(evaluations::list_feedbacks)
        .service(users::create_user)
        .service(users::list_users)
        .service(users::get_user)
        .service(users::update_user)
        .service(users::delete_user)
        .service(messages::create_message)
        .service(messages::list_messages)
}
