//! Identity of the caller as supplied by the upstream auth layer.
//!
//! Credentials are never checked here; the values are trusted as given.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::Error;

/// Caller privilege level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Candidate practising for the exam.
    #[default]
    User,
    /// Content and account administrator.
    Admin,
}

impl Role {
    /// Parse a role header value, treating unknown values as [`Role::User`].
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// Caller on whose behalf an operation runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingUser {
    user_id: String,
    email: String,
    role: Role,
}

impl ActingUser {
    /// Build an acting user.
    pub fn new(user_id: impl Into<String>, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            role,
        }
    }

    /// Caller's user id.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Caller's email.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Caller's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the caller may use admin operations.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with `Forbidden` unless the caller is an admin.
    ///
    /// # Errors
    ///
    /// [`crate::domain::ErrorCode::Forbidden`] naming `action`.
    pub fn require_admin(&self, action: &str) -> Result<(), Error> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::forbidden(format!("You are not authorized to {action}")))
        }
    }
}
