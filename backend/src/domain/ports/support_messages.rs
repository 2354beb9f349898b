//! Driving port for the support inbox.

use async_trait::async_trait;

use crate::domain::{ActingUser, Error, NewSupportMessage, SupportMessage};

/// Support message use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SupportMessages: Send + Sync {
    /// Store a message and notify the support team.
    ///
    /// A failed notification is logged and does not fail the call.
    async fn create(
        &self,
        actor: &ActingUser,
        message: NewSupportMessage,
    ) -> Result<SupportMessage, Error>;

    /// Messages sent by the caller, oldest first.
    async fn list_own(&self, actor: &ActingUser) -> Result<Vec<SupportMessage>, Error>;
}
