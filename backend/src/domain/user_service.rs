//! User registry domain service.
//!
//! Implements the [`UsersCommand`] and [`UsersQuery`] driving ports on top of
//! a [`UserRepository`]. Validation always runs before the repository is
//! touched, and the duplicate-email check happens on creation only.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use mockable::Clock;
use tracing::{error, info, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{Error, User, UserDraft, UserId, ValidatedUser, validate_user};

/// User registry service implementing the driving ports.
#[derive(Clone)]
pub struct UserRegistryService<R: ?Sized> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R: ?Sized> UserRegistryService<R> {
    /// Create a new service over `repository`, reading "today" from `clock`.
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// The current UTC calendar date.
    fn today(&self) -> NaiveDate {
        self.clock.utc().date_naive()
    }

    fn validate(&self, draft: UserDraft) -> Result<ValidatedUser, Error> {
        validate_user(draft, self.today()).map_err(|errors| {
            info!(errors = %errors, "user record rejected by validation");
            Error::from(errors)
        })
    }
}

/// Log the adapter failure and hand back a redacted domain error.
fn map_persistence_error(operation: &'static str, failure: UserPersistenceError) -> Error {
    error!(%operation, error = %failure, "user repository failure");
    Error::internal(format!("user repository failed during {operation}"))
}

fn not_found(raw_id: &str) -> Error {
    Error::not_found(format!("user {raw_id} not found"))
}

/// Resolve a raw identifier; text that is not a UUID cannot name a user.
fn resolve_id(raw_id: &str) -> Result<UserId, Error> {
    UserId::new(raw_id).map_err(|_| not_found(raw_id))
}

#[async_trait]
impl<R> UsersCommand for UserRegistryService<R>
where
    R: UserRepository + ?Sized,
{
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error> {
        let ValidatedUser {
            name,
            email,
            birth_date,
        } = self.validate(draft)?;

        let existing = self
            .repository
            .find_by_email(&email)
            .await
            .map_err(|failure| map_persistence_error("create", failure))?;
        if existing.is_some() {
            warn!(email = %email, "registration rejected: email already registered");
            return Err(Error::duplicate_email(format!(
                "email {email} is already registered"
            )));
        }

        let user = User::new(UserId::random(), name, email, birth_date);
        self.repository
            .insert(&user)
            .await
            .map_err(|failure| map_persistence_error("create", failure))?;

        info!(user_id = %user.id(), "user created");
        Ok(user)
    }

    async fn update_user(&self, id: &str, draft: UserDraft) -> Result<User, Error> {
        let ValidatedUser {
            name,
            email,
            birth_date,
        } = self.validate(draft)?;
        let user_id = resolve_id(id)?;

        let user = User::new(user_id, name, email, birth_date);
        let updated = self
            .repository
            .update(&user)
            .await
            .map_err(|failure| map_persistence_error("update", failure))?;
        if !updated {
            return Err(not_found(id));
        }

        info!(user_id = %user.id(), "user updated");
        Ok(user)
    }

    async fn delete_user(&self, id: &str) -> Result<(), Error> {
        let user_id = resolve_id(id)?;
        let deleted = self
            .repository
            .delete(&user_id)
            .await
            .map_err(|failure| map_persistence_error("delete", failure))?;
        if !deleted {
            return Err(not_found(id));
        }

        info!(user_id = %user_id, "user deleted");
        Ok(())
    }
}

#[async_trait]
impl<R> UsersQuery for UserRegistryService<R>
where
    R: UserRepository + ?Sized,
{
    async fn list_users(&self) -> Result<Vec<User>, Error> {
        self.repository
            .list()
            .await
            .map_err(|failure| map_persistence_error("list", failure))
    }
}
