//! Document store adapters.
//!
//! [`DieselDocumentStore`] keeps every document as a JSONB row in PostgreSQL
//! through `diesel-async` and a `bb8` pool. [`InMemoryDocumentStore`] serves
//! tests and database-less runs. Row structs and the Diesel schema stay
//! private to this module.
//!
//! # Example
//!
//! ```no_run
//! use osce_backend::outbound::persistence::{DbPool, DieselDocumentStore, PoolConfig};
//!
//! # async fn connect() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/osce")).await?;
//! let store = DieselDocumentStore::new(pool);
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

mod diesel_document_store;
mod in_memory_document_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_document_store::DieselDocumentStore;
pub use in_memory_document_store::InMemoryDocumentStore;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
