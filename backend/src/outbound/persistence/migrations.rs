//! Embedded schema migrations.
//!
//! Diesel's migration harness needs a synchronous connection, so the run
//! happens on the blocking pool.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Migrations compiled in from `backend/migrations`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// The database could not be reached.
    #[error("migration connection failed: {0}")]
    Connect(String),
    /// A migration failed to apply.
    #[error("migration failed: {0}")]
    Apply(String),
}

/// Apply every pending migration, returning how many ran.
///
/// # Errors
///
/// [`MigrationError`] when connecting or applying fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || {
        let mut connection =
            PgConnection::establish(&url).map_err(|err| MigrationError::Connect(err.to_string()))?;
        connection
            .run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| MigrationError::Apply(err.to_string()))
    })
    .await
    .map_err(|err| MigrationError::Apply(err.to_string()))??;
    info!(applied, "database migrations applied");
    Ok(applied)
}
