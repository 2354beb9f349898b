//! User directory service and the shared user-record editor.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::{Page, PageParams};
use serde_json::{Value, json};
use tracing::info;

use crate::domain::collection::USERS;
use crate::domain::ports::{DocumentStore, UserDirectory};
use crate::domain::record::{Filters, Record, from_record, to_record, write_list};
use crate::domain::record_store::{Mutation, MutationError, RecordStore, RecordStoreError};
use crate::domain::user_profile::{
    MOCK_PROGRESS_FIELD, NewUser, STATION_PROGRESS_FIELD, UserPatch, UserProfile,
};
use crate::domain::{ActingUser, Error, Role};

const USER_NOT_FOUND: &str = "User not found";

/// Edit the user record with `user_id`, mapping a missing record to
/// `NotFound("User not found")`.
pub(crate) async fn edit_user<S, T, F>(
    records: &RecordStore<S>,
    user_id: &str,
    apply: F,
) -> Result<T, Error>
where
    S: DocumentStore,
    F: FnMut(&mut Record) -> Result<Mutation<T>, Error> + Send,
    T: Send,
{
    records
        .modify_record(&USERS, "user_id", &Value::from(user_id), apply)
        .await
        .map_err(|err| match err {
            MutationError::Store(RecordStoreError::NotFound { .. }) => {
                Error::not_found(USER_NOT_FOUND)
            }
            MutationError::Store(other) => other.into(),
            MutationError::Rejected(err) => err,
        })
}

/// [`UserDirectory`] over the record store.
pub struct UserService<S> {
    records: RecordStore<S>,
    clock: Arc<dyn Clock>,
}

impl<S> UserService<S> {
    /// Create the service.
    pub fn new(records: RecordStore<S>, clock: Arc<dyn Clock>) -> Self {
        Self { records, clock }
    }
}

#[async_trait]
impl<S: DocumentStore> UserDirectory for UserService<S> {
    async fn create_user(&self, actor: &ActingUser, user: NewUser) -> Result<UserProfile, Error> {
        if user.user_id != actor.user_id() && !actor.is_admin() {
            return Err(Error::forbidden("You may only register your own profile"));
        }
        let role = user.role.unwrap_or_default();
        if role == Role::Admin {
            actor.require_admin("grant the admin role")?;
        }

        let profile = UserProfile {
            user_id: user.user_id,
            email: user.email.to_lowercase(),
            name: user.name,
            role,
            created_at: self.clock.utc().to_rfc3339(),
            has_paid: false,
            mock_progress: Vec::new(),
            station_progress: Vec::new(),
            flagged_stations: Vec::new(),
            booked_mocks: Vec::new(),
        };
        let record = to_record(&profile)?;

        self.records
            .mutate(&USERS, |users, _| {
                for field in ["user_id", "email"] {
                    if users.iter().any(|existing| existing.get(field) == record.get(field)) {
                        return Err(Error::from(RecordStoreError::conflict(field)));
                    }
                }
                users.push(record.clone());
                Ok(Mutation::Write(()))
            })
            .await
            .map_err(MutationError::into_inner)?;

        info!(user_id = %profile.user_id, "user registered");
        Ok(profile)
    }

    async fn get_user(&self, user_id: &str) -> Result<UserProfile, Error> {
        let found = match self
            .records
            .get(&USERS, &Filters::new().eq("user_id", user_id))
            .await
        {
            Ok(users) => users.into_iter().next(),
            Err(RecordStoreError::NotFound { .. }) => None,
            Err(err) => return Err(err.into()),
        };
        let record = found.ok_or_else(|| Error::not_found(USER_NOT_FOUND))?;
        Ok(from_record(record)?)
    }

    async fn list_users(&self, params: PageParams) -> Result<Page<UserProfile>, Error> {
        let all = Filters::new();
        let total = self.records.count(&USERS, &all).await?;
        let users = self
            .records
            .get_paginated(&USERS, &all, params.to_request())
            .await?
            .into_iter()
            .map(from_record)
            .collect::<Result<Vec<UserProfile>, _>>()?;
        Ok(Page::new(users, params, total))
    }

    async fn update_user(
        &self,
        actor: &ActingUser,
        user_id: &str,
        patch: UserPatch,
    ) -> Result<UserProfile, Error> {
        actor.require_admin("update users")?;
        if patch.is_empty() {
            return Err(Error::invalid_request("No updatable fields supplied")
                .with_details(json!({ "code": "empty_patch" })));
        }

        let updated = edit_user(&self.records, user_id, |user| {
            if let Some(progress) = &patch.mock_progress {
                write_list(user, MOCK_PROGRESS_FIELD, progress)?;
            }
            if let Some(progress) = &patch.station_progress {
                write_list(user, STATION_PROGRESS_FIELD, progress)?;
            }
            if let Some(has_paid) = patch.has_paid {
                user.insert("has_paid".to_owned(), Value::Bool(has_paid));
            }
            Ok(Mutation::Write(user.clone()))
        })
        .await?;

        info!(user_id, "user updated");
        Ok(from_record(updated)?)
    }

    async fn delete_user(&self, actor: &ActingUser, user_id: &str) -> Result<(), Error> {
        actor.require_admin("delete users")?;
        match self
            .records
            .delete(&USERS, &["user_id"], &[Value::from(user_id)])
            .await
        {
            Ok(_) => {
                info!(user_id, "user deleted");
                Ok(())
            }
            Err(RecordStoreError::NotFound { .. }) => Err(Error::not_found(USER_NOT_FOUND)),
            Err(err) => Err(err.into()),
        }
    }
}
