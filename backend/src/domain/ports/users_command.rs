//! Driving port for user registration mutations.

use async_trait::async_trait;

use crate::domain::{Error, User, UserDraft};

/// Domain use-case port for creating, editing, and removing users.
///
/// Identifiers arrive as raw path text; a value that cannot name a stored
/// user is reported as not found.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Validate `draft`, reject duplicate emails, and store a new user.
    async fn create_user(&self, draft: UserDraft) -> Result<User, Error>;

    /// Validate `draft` and overwrite the user identified by `id`.
    async fn update_user(&self, id: &str, draft: UserDraft) -> Result<User, Error>;

    /// Remove the user identified by `id`.
    async fn delete_user(&self, id: &str) -> Result<(), Error>;
}
