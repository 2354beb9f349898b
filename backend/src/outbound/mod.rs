//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL and in-memory [`DocumentStore`] adapters
//! - **notification**: support-inbox notification delivery
//!
//! Adapters translate between storage representations and domain types and
//! hold no business rules.
//!
//! [`DocumentStore`]: crate::domain::ports::DocumentStore

pub mod notification;
pub mod persistence;
