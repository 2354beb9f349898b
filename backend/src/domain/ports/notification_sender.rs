//! Port for out-of-band notifications raised after a mutation succeeds.
//!
//! Delivery is best effort: callers log failures and carry on, so a broken
//! mail relay never turns a stored support message into a failed request.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification adapters.
    pub enum NotificationError {
        /// The downstream channel rejected or dropped the notification.
        Delivery { message: String } => "notification delivery failed: {message}",
    }
}

/// A message addressed to the support inbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportNotification {
    /// Subject line supplied by the sender.
    pub subject: String,
    /// Free-text body.
    pub body: String,
    /// Reply-to address supplied by the sender.
    pub reply_to: String,
    /// RFC 3339 timestamp at which the message was stored.
    pub received_at: String,
}

/// Outbound notification channel.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationSender: Send + Sync {
    /// Announce a newly stored support message.
    async fn support_message_received(
        &self,
        notification: &SupportNotification,
    ) -> Result<(), NotificationError>;
}
