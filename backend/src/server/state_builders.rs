//! Builders wiring domain services over the configured document store.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::info;

use osce_backend::domain::ports::{DocumentStore, NotificationSender};
use osce_backend::domain::{
    BookingCoordinator, CatalogueService, EvaluationService, RecordStore, SupportService,
    UserService,
};
use osce_backend::inbound::http::state::{HttpState, HttpStatePorts};
use osce_backend::outbound::notification::LoggingNotificationSender;
use osce_backend::outbound::persistence::{DieselDocumentStore, InMemoryDocumentStore};

use super::ServerConfig;

/// Inbox support notifications are addressed to.
const SUPPORT_INBOX: &str = "support";

fn wire_services<S>(
    store: Arc<S>,
    config: &ServerConfig,
    clock: &Arc<dyn Clock>,
    notifier: Arc<dyn NotificationSender>,
) -> HttpState
where
    S: DocumentStore + 'static,
{
    let records = RecordStore::with_max_attempts(store, config.store_max_attempts);
    let bookings = Arc::new(
        BookingCoordinator::new(records.clone(), clock.clone())
            .with_default_max_users(config.default_max_users),
    );
    let catalogue = Arc::new(CatalogueService::new(records.clone(), clock.clone()));
    HttpState::new(HttpStatePorts {
        bookings: bookings.clone(),
        bookings_query: bookings,
        catalogue: catalogue.clone(),
        catalogue_query: catalogue,
        evaluations: Arc::new(EvaluationService::new(records.clone(), clock.clone())),
        users: Arc::new(UserService::new(records.clone(), clock.clone())),
        messages: Arc::new(SupportService::new(records, notifier, clock.clone())),
    })
    .with_admin_emails(config.admin_emails.iter().cloned())
}

/// Build the shared HTTP state.
///
/// Uses PostgreSQL when a pool is configured and an in-memory store
/// otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let notifier: Arc<dyn NotificationSender> =
        Arc::new(LoggingNotificationSender::new(SUPPORT_INBOX));
    let state = match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "document store selected");
            wire_services(
                Arc::new(DieselDocumentStore::new(pool.clone())),
                config,
                &clock,
                notifier,
            )
        }
        None => {
            info!(store = "memory", "document store selected; data is lost on exit");
            wire_services(Arc::new(InMemoryDocumentStore::new()), config, &clock, notifier)
        }
    };
    web::Data::new(state)
}
