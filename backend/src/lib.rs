//! OSCE mock-exam backend.
//!
//! Slot bookings with capacity limits, a per-user booking mirror kept
//! consistent with the bookings, the station and mock catalogue, call
//! transcripts and feedback, user profiles and a support inbox. Every
//! collection is an array inside a JSON container document, written with
//! optimistic concurrency through [`domain::RecordStore`].

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
pub use settings::AppSettings;
