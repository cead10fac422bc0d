//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{EmailAddress, User, UserId};

/// Persistence errors raised by user repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserPersistenceError {
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query { message: String },
}

impl UserPersistenceError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Driven port storing registered users keyed by identifier.
///
/// Email uniqueness is not a repository concern; callers look up by email
/// before inserting.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user record.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch every stored user, oldest first.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;

    /// Fetch the user registered with `email`, if any.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Overwrite the mutable fields of an existing user.
    ///
    /// Returns `false` when no user with the same identifier exists.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;

    /// Hard-delete a user.
    ///
    /// Returns `false` when no user with `id` exists.
    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError>;
}
