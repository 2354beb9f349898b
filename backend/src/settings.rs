//! Application settings loaded via OrthoConfig.
//!
//! Values layer defaults, an optional config file, `OSCE_*` environment
//! variables and command-line flags, later layers winning.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_USERS};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Settings that cannot be turned into a running server.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}")]
    BindAddr {
        /// Configured value.
        value: String,
    },
    /// A numeric setting must be at least one.
    #[error("{field} must be at least 1")]
    Zero {
        /// Offending setting.
        field: &'static str,
    },
}

/// Process-wide configuration.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "OSCE")]
pub struct AppSettings {
    /// Listen address; `0.0.0.0:8080` when unset.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without one, documents live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled connections.
    pub pool_max_size: Option<u32>,
    /// Attempts per record-store mutation before giving up.
    pub store_max_attempts: Option<u32>,
    /// Capacity given to newly created slots.
    pub default_max_users: Option<u32>,
    /// Comma-separated emails treated as admins.
    pub admin_emails: Option<String>,
    /// Apply pending migrations on start-up.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
}

fn at_least_one(value: Option<u32>, default: u32, field: &'static str) -> Result<u32, SettingsError> {
    match value.unwrap_or(default) {
        0 => Err(SettingsError::Zero { field }),
        n => Ok(n),
    }
}

impl AppSettings {
    /// Parsed listen address.
    ///
    /// # Errors
    ///
    /// [`SettingsError::BindAddr`] when the value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.trim().parse().map_err(|_| SettingsError::BindAddr {
            value: raw.to_owned(),
        })
    }

    /// Configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Connection pool size.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Zero`] when configured as zero.
    pub fn pool_max_size(&self) -> Result<u32, SettingsError> {
        at_least_one(self.pool_max_size, DEFAULT_POOL_MAX_SIZE, "pool_max_size")
    }

    /// Optimistic-concurrency attempt bound.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Zero`] when configured as zero.
    pub fn store_max_attempts(&self) -> Result<u32, SettingsError> {
        at_least_one(self.store_max_attempts, DEFAULT_MAX_ATTEMPTS, "store_max_attempts")
    }

    /// Capacity for new slots.
    ///
    /// # Errors
    ///
    /// [`SettingsError::Zero`] when configured as zero.
    pub fn default_max_users(&self) -> Result<u32, SettingsError> {
        at_least_one(self.default_max_users, DEFAULT_MAX_USERS, "default_max_users")
    }

    /// Admin emails, trimmed and without blanks.
    pub fn admin_emails(&self) -> Vec<String> {
        self.admin_emails
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .map(str::to_owned)
            .collect()
    }
}
