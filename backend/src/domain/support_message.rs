//! Support inbox messages.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Stored message to the support team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SupportMessage {
    /// UUID assigned on save.
    pub message_id: String,
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub message: String,
    /// Sender's user id.
    pub created_by: String,
    /// Save time (RFC 3339).
    pub created_at: String,
    /// Reply-to address.
    pub email: String,
    /// Staff reply; null until answered.
    #[serde(default)]
    pub response: Option<String>,
}

/// Message fields supplied by the sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSupportMessage {
    /// Subject line.
    pub subject: String,
    /// Body text.
    pub message: String,
    /// Reply-to address; the sender's own email when absent.
    pub email: Option<String>,
}
