//! Driving port for user profiles.

use async_trait::async_trait;
use pagination::{Page, PageParams};

use crate::domain::{ActingUser, Error, NewUser, UserPatch, UserProfile};

/// Profile use-cases. Credentials are handled upstream and never stored.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Register a profile.
    ///
    /// Callers may only register themselves unless they are admins, and
    /// only admins may grant the admin role.
    ///
    /// # Errors
    ///
    /// `Conflict` when the id or email is taken, `Forbidden` as above.
    async fn create_user(&self, actor: &ActingUser, user: NewUser) -> Result<UserProfile, Error>;

    /// Fetch a profile.
    async fn get_user(&self, user_id: &str) -> Result<UserProfile, Error>;

    /// One page of profiles with the overall total.
    async fn list_users(&self, params: PageParams) -> Result<Page<UserProfile>, Error>;

    /// Admin edit of progress and payment fields.
    async fn update_user(
        &self,
        actor: &ActingUser,
        user_id: &str,
        patch: UserPatch,
    ) -> Result<UserProfile, Error>;

    /// Admin removal of a profile.
    async fn delete_user(&self, actor: &ActingUser, user_id: &str) -> Result<(), Error>;
}
