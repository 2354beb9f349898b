//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use osce_backend::domain::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_USERS};
use osce_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) store_max_attempts: u32,
    pub(crate) default_max_users: u32,
    pub(crate) admin_emails: Vec<String>,
}

impl ServerConfig {
    /// Configuration serving from memory with default limits.
    #[must_use]
    pub const fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            store_max_attempts: DEFAULT_MAX_ATTEMPTS,
            default_max_users: DEFAULT_MAX_USERS,
            admin_emails: Vec::new(),
        }
    }

    /// Persist documents in PostgreSQL through `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Bound on optimistic-concurrency attempts per mutation.
    #[must_use]
    pub const fn with_store_max_attempts(mut self, attempts: u32) -> Self {
        self.store_max_attempts = attempts;
        self
    }

    /// Capacity for newly created slots.
    #[must_use]
    pub const fn with_default_max_users(mut self, max_users: u32) -> Self {
        self.default_max_users = max_users;
        self
    }

    /// Emails granted admin rights regardless of the role header.
    #[must_use]
    pub fn with_admin_emails(mut self, emails: Vec<String>) -> Self {
        self.admin_emails = emails;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
