//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use super::acting_user::{USER_EMAIL_HEADER, USER_ID_HEADER, USER_ROLE_HEADER};
use super::api_scope;
use super::state::{HttpState, HttpStatePorts};
use crate::domain::ports::{
    MockBookingCommand, MockBookingQuery, MockCatalogueCommand, MockCatalogueQuery,
    MockEvaluations, MockSupportMessages, MockUserDirectory,
};
use crate::domain::{
    BookingCoordinator, CatalogueService, EvaluationService, RecordStore, SupportService,
    UserService,
};
use crate::outbound::notification::LoggingNotificationSender;
use crate::outbound::persistence::InMemoryDocumentStore;
use crate::test_support::fixture_clock;

/// One mock per port; configure the ones a test calls.
#[derive(Default)]
pub struct StatePorts {
    pub bookings: MockBookingCommand,
    pub bookings_query: MockBookingQuery,
    pub catalogue: MockCatalogueCommand,
    pub catalogue_query: MockCatalogueQuery,
    pub evaluations: MockEvaluations,
    pub users: MockUserDirectory,
    pub messages: MockSupportMessages,
}

impl StatePorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            bookings: Arc::new(self.bookings),
            bookings_query: Arc::new(self.bookings_query),
            catalogue: Arc::new(self.catalogue),
            catalogue_query: Arc::new(self.catalogue_query),
            evaluations: Arc::new(self.evaluations),
            users: Arc::new(self.users),
            messages: Arc::new(self.messages),
        })
    }
}

/// Real services over a shared in-memory store and the fixture clock.
pub fn in_memory_state(store: Arc<InMemoryDocumentStore>) -> HttpState {
    let records = RecordStore::new(store);
    let clock = fixture_clock();
    let bookings = Arc::new(BookingCoordinator::new(records.clone(), clock.clone()));
    let catalogue = Arc::new(CatalogueService::new(records.clone(), clock.clone()));
    HttpState::new(HttpStatePorts {
        bookings: bookings.clone(),
        bookings_query: bookings,
        catalogue: catalogue.clone(),
        catalogue_query: catalogue,
        evaluations: Arc::new(EvaluationService::new(records.clone(), clock.clone())),
        users: Arc::new(UserService::new(records.clone(), clock.clone())),
        messages: Arc::new(SupportService::new(
            records,
            Arc::new(LoggingNotificationSender::new("support@example.com")),
            clock,
        )),
    })
}

/// App serving the full `/api/v1` scope over `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(api_scope())
}

/// Identity headers for an ordinary user.
pub fn identity(user_id: &'static str, email: &'static str) -> [(&'static str, &'static str); 2] {
    [(USER_ID_HEADER, user_id), (USER_EMAIL_HEADER, email)]
}

/// Identity headers for an administrator.
pub fn admin_identity() -> [(&'static str, &'static str); 3] {
    [
        (USER_ID_HEADER, "admin-1"),
        (USER_EMAIL_HEADER, "admin@example.com"),
        (USER_ROLE_HEADER, "admin"),
    ]
}
