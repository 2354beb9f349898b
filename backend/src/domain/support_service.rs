//! Support inbox service.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::collection::MESSAGES;
use crate::domain::ports::{DocumentStore, NotificationSender, SupportMessages, SupportNotification};
use crate::domain::record::{Filters, from_record, to_record};
use crate::domain::record_store::{RecordStore, RecordStoreError};
use crate::domain::support_message::{NewSupportMessage, SupportMessage};
use crate::domain::{ActingUser, Error};

/// [`SupportMessages`] over the record store and a notification channel.
pub struct SupportService<S> {
    records: RecordStore<S>,
    notifier: Arc<dyn NotificationSender>,
    clock: Arc<dyn Clock>,
}

impl<S> SupportService<S> {
    /// Create the service.
    pub fn new(
        records: RecordStore<S>,
        notifier: Arc<dyn NotificationSender>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            records,
            notifier,
            clock,
        }
    }
}

#[async_trait]
impl<S: DocumentStore> SupportMessages for SupportService<S> {
    async fn create(
        &self,
        actor: &ActingUser,
        message: NewSupportMessage,
    ) -> Result<SupportMessage, Error> {
        let stored = SupportMessage {
            message_id: Uuid::new_v4().to_string(),
            subject: message.subject,
            message: message.message,
            created_by: actor.user_id().to_owned(),
            created_at: self.clock.utc().to_rfc3339(),
            email: message.email.unwrap_or_else(|| actor.email().to_owned()),
            response: None,
        };
        self.records
            .add(&MESSAGES, to_record(&stored)?, &["message_id"])
            .await?;
        info!(message_id = %stored.message_id, "support message stored");

        let notification = SupportNotification {
            subject: stored.subject.clone(),
            body: stored.message.clone(),
            reply_to: stored.email.clone(),
            received_at: stored.created_at.clone(),
        };
        if let Err(err) = self.notifier.support_message_received(&notification).await {
            warn!(message_id = %stored.message_id, error = %err, "support notification not delivered");
        }
        Ok(stored)
    }

    async fn list_own(&self, actor: &ActingUser) -> Result<Vec<SupportMessage>, Error> {
        let records = match self
            .records
            .get(&MESSAGES, &Filters::new().eq("created_by", actor.user_id()))
            .await
        {
            Ok(records) => records,
            Err(RecordStoreError::NotFound { .. }) => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        records
            .into_iter()
            .map(|record| from_record(record).map_err(Error::from))
            .collect()
    }
}
