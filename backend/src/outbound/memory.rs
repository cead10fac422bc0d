//! Process-local [`UserRepository`] used when no database is configured.
//!
//! Records live in a `Vec` guarded by a mutex so listing keeps insertion
//! order. Nothing survives a restart.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, User, UserId};

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
}

impl InMemoryUserRepository {
    /// Create a store pre-populated with `users`, in order.
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().collect()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<User>>, UserPersistenceError> {
        self.users
            .lock()
            .map_err(|_| UserPersistenceError::connection("in-memory user store lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.lock()?;
        if users.iter().any(|existing| existing.id() == user.id()) {
            return Err(UserPersistenceError::query(format!(
                "user {} already exists",
                user.id()
            )));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock()?.clone())
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()?
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut users = self.lock()?;
        match users.iter_mut().find(|existing| existing.id() == user.id()) {
            Some(slot) => {
                *slot = user.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut users = self.lock()?;
        let before = users.len();
        users.retain(|user| user.id() != id);
        Ok(users.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::{BirthDate, FullName};

    fn user(name: &str, email: &str) -> User {
        User::new(
            UserId::random(),
            FullName::new(name).expect("valid name"),
            EmailAddress::new(email).expect("valid email"),
            BirthDate::from_date(NaiveDate::from_ymd_opt(1990, 4, 2).expect("valid date")),
        )
    }

    #[fixture]
    fn seeded() -> (InMemoryUserRepository, Vec<User>) {
        let users = vec![
            user("Jonas Jonaitis", "jonas@example.com"),
            user("Ona Onaite", "ona@example.com"),
            user("Petras Petraitis", "petras@example.com"),
        ];
        (InMemoryUserRepository::with_users(users.clone()), users)
    }

    #[rstest]
    #[tokio::test]
    async fn list_preserves_insertion_order(seeded: (InMemoryUserRepository, Vec<User>)) {
        let (repo, users) = seeded;
        let extra = user("Ieva Ievaite", "ieva@example.com");
        repo.insert(&extra).await.expect("insert");

        let listed = repo.list().await.expect("list");
        let mut expected = users;
        expected.push(extra);
        assert_eq!(listed, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn insert_rejects_repeated_ids(seeded: (InMemoryUserRepository, Vec<User>)) {
        let (repo, users) = seeded;
        let error = repo.insert(&users[0]).await.expect_err("duplicate id");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn find_by_email_matches_exactly(seeded: (InMemoryUserRepository, Vec<User>)) {
        let (repo, users) = seeded;
        let email = EmailAddress::new("ona@example.com").expect("valid email");
        let found = repo.find_by_email(&email).await.expect("lookup");
        assert_eq!(found.as_ref(), Some(&users[1]));

        let other = EmailAddress::new("ONA@example.com").expect("valid email");
        assert!(repo.find_by_email(&other).await.expect("lookup").is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn update_replaces_in_place(seeded: (InMemoryUserRepository, Vec<User>)) {
        let (repo, users) = seeded;
        let replacement = User::new(
            *users[1].id(),
            FullName::new("Ona Jonaitiene").expect("valid name"),
            EmailAddress::new("ona@example.com").expect("valid email"),
            users[1].birth_date(),
        );

        assert!(repo.update(&replacement).await.expect("update"));
        let listed = repo.list().await.expect("list");
        assert_eq!(listed[1], replacement);
        assert_eq!(listed.len(), 3);
    }

    #[rstest]
    #[tokio::test]
    async fn update_and_delete_report_missing_ids(seeded: (InMemoryUserRepository, Vec<User>)) {
        let (repo, _) = seeded;
        let stranger = user("Nobody Known", "nobody@example.com");

        assert!(!repo.update(&stranger).await.expect("update"));
        assert!(!repo.delete(stranger.id()).await.expect("delete"));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_removes_only_the_target(seeded: (InMemoryUserRepository, Vec<User>)) {
        let (repo, users) = seeded;
        assert!(repo.delete(users[0].id()).await.expect("delete"));

        let listed = repo.list().await.expect("list");
        assert_eq!(listed, users[1..].to_vec());
    }
}
