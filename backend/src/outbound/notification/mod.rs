//! Notification adapters.
//!
//! No mail relay is wired in; [`LoggingNotificationSender`] records each
//! notification as a structured log event so operators can forward them.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{NotificationError, NotificationSender, SupportNotification};

/// [`NotificationSender`] that emits a `tracing` event per notification.
#[derive(Debug, Clone, Default)]
pub struct LoggingNotificationSender {
    inbox: String,
}

impl LoggingNotificationSender {
    /// Address the events to `inbox`.
    pub fn new(inbox: impl Into<String>) -> Self {
        Self {
            inbox: inbox.into(),
        }
    }
}

#[async_trait]
impl NotificationSender for LoggingNotificationSender {
    async fn support_message_received(
        &self,
        notification: &SupportNotification,
    ) -> Result<(), NotificationError> {
        info!(
            target: "osce_backend::notifications",
            inbox = %self.inbox,
            subject = %notification.subject,
            reply_to = %notification.reply_to,
            received_at = %notification.received_at,
            "support message received"
        );
        Ok(())
    }
}
