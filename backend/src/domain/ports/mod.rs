//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`DocumentStore`], [`NotificationSender`]) are implemented
//! by outbound adapters. Driving ports are the use-cases inbound adapters
//! call; the domain services implement them.

mod macros;
pub(crate) use macros::define_port_error;

mod booking_command;
mod booking_query;
mod catalogue;
mod document_store;
mod evaluations;
mod notification_sender;
mod support_messages;
mod user_directory;

#[cfg(test)]
pub use booking_command::MockBookingCommand;
pub use booking_command::{
    BookingCommand, BookingReceipt, JoinRequest, MoveReceipt, MoveRequest, ReconcileReport,
};
#[cfg(test)]
pub use booking_query::MockBookingQuery;
pub use booking_query::BookingQuery;
#[cfg(test)]
pub use catalogue::{MockCatalogueCommand, MockCatalogueQuery};
pub use catalogue::{CatalogueCommand, CatalogueQuery};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{DocumentStore, DocumentStoreError, VersionedDocument};
#[cfg(test)]
pub use evaluations::MockEvaluations;
pub use evaluations::{Evaluations, FeedbackReceipt};
#[cfg(test)]
pub use notification_sender::MockNotificationSender;
pub use notification_sender::{NotificationError, NotificationSender, SupportNotification};
#[cfg(test)]
pub use support_messages::MockSupportMessages;
pub use support_messages::SupportMessages;
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::UserDirectory;
