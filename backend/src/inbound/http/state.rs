//! Shared HTTP adapter state.
//!
//! Handlers receive [`HttpState`] through `web::Data` and only see driving
//! ports, so tests can swap in mocks or in-memory services.

use std::collections::HashSet;
use std::sync::Arc;

use crate::domain::ports::{
    BookingCommand, BookingQuery, CatalogueCommand, CatalogueQuery, Evaluations, SupportMessages,
    UserDirectory,
};

/// Parameter object bundling every port the handlers call.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub catalogue: Arc<dyn CatalogueCommand>,
    pub catalogue_query: Arc<dyn CatalogueQuery>,
    pub evaluations: Arc<dyn Evaluations>,
    pub users: Arc<dyn UserDirectory>,
    pub messages: Arc<dyn SupportMessages>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub bookings: Arc<dyn BookingCommand>,
    pub bookings_query: Arc<dyn BookingQuery>,
    pub catalogue: Arc<dyn CatalogueCommand>,
    pub catalogue_query: Arc<dyn CatalogueQuery>,
    pub evaluations: Arc<dyn Evaluations>,
    pub users: Arc<dyn UserDirectory>,
    pub messages: Arc<dyn SupportMessages>,
    admin_emails: Arc<HashSet<String>>,
}

impl HttpState {
    /// Construct state with no configured administrators.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            bookings,
            bookings_query,
            catalogue,
            catalogue_query,
            evaluations,
            users,
            messages,
        } = ports;
        Self {
            bookings,
            bookings_query,
            catalogue,
            catalogue_query,
            evaluations,
            users,
            messages,
            admin_emails: Arc::new(HashSet::new()),
        }
    }

    /// Treat callers with any of these emails as administrators.
    ///
    /// Comparison is case-insensitive.
    #[must_use]
    pub fn with_admin_emails<I, E>(mut self, emails: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: AsRef<str>,
    {
        self.admin_emails = Arc::new(
            emails
                .into_iter()
                .map(|email| email.as_ref().trim().to_lowercase())
                .filter(|email| !email.is_empty())
                .collect(),
        );
        self
    }

    /// Whether `email` is a configured administrator.
    pub fn is_admin_email(&self, email: &str) -> bool {
        self.admin_emails.contains(&email.trim().to_lowercase())
    }
}
