//! Backend entry-point: loads settings, prepares the document store and
//! serves the REST API.

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use ortho_config::OrthoConfig;
use osce_backend::AppSettings;
use osce_backend::inbound::http::health::HealthState;
use osce_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

async fn connect(settings: &AppSettings, database_url: &str) -> Result<DbPool> {
    if settings.run_migrations {
        let applied = run_pending_migrations(database_url)
            .await
            .wrap_err("failed to apply database migrations")?;
        info!(applied, "database schema up to date");
    }
    let pool_config = PoolConfig::new(database_url).with_max_size(settings.pool_max_size()?);
    DbPool::new(pool_config)
        .await
        .wrap_err("failed to build database pool")
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let mut config = ServerConfig::new(settings.bind_addr()?)
        .with_store_max_attempts(settings.store_max_attempts()?)
        .with_default_max_users(settings.default_max_users()?)
        .with_admin_emails(settings.admin_emails());
    match settings.database_url() {
        Some(url) => config = config.with_db_pool(connect(&settings, url).await?),
        None => warn!("OSCE_DATABASE_URL not set; serving from memory"),
    }

    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)
        .wrap_err_with(|| format!("failed to bind {bind_addr}"))?;
    info!(%bind_addr, "server listening");
    server.await.wrap_err("server terminated with an error")
}
