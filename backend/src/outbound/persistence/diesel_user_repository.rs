//! PostgreSQL-backed [`UserRepository`] using Diesel.

use async_trait::async_trait;
use diesel::dsl::now;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{BirthDate, EmailAddress, FullName, User, UserId};

use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            UserPersistenceError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            UserPersistenceError::connection("database connection error")
        }
        DieselError::NotFound => UserPersistenceError::query("record not found"),
        DieselError::QueryBuilderError(_) => UserPersistenceError::query("database query error"),
        _ => UserPersistenceError::query("database error"),
    }
}

/// Rebuild a domain user from a stored row.
///
/// Rows are written only after validation, so a failure here means the table
/// was edited out of band.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let invalid = |field: &str, reason: String| {
        warn!(user_id = %row.id, field, %reason, "stored user row failed validation");
        UserPersistenceError::query(format!("stored user {} has an invalid {field}", row.id))
    };
    let name = FullName::new(&row.name).map_err(|err| invalid("name", err.to_string()))?;
    let email = EmailAddress::new(&row.email).map_err(|err| invalid("email", err.to_string()))?;

    Ok(User::new(
        UserId::from_uuid(row.id),
        name,
        email,
        BirthDate::from_date(row.birth_date),
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            birth_date: user.birth_date().as_date(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .order((users::created_at.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_user).transpose()
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = UserUpdate {
            name: user.name().as_ref(),
            email: user.email().as_ref(),
            birth_date: user.birth_date().as_date(),
        };

        let affected = diesel::update(users::table.find(user.id().as_uuid()))
            .set((&changes, users::updated_at.eq(now)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let affected = diesel::delete(users::table.find(id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rstest::rstest;
    use uuid::Uuid;

    use super::*;

    fn row(name: &str, email: &str) -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            email: email.to_owned(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 2).expect("valid date"),
        }
    }

    #[rstest]
    #[case(PoolError::checkout("connection refused"))]
    #[case(PoolError::build("bad url"))]
    fn pool_errors_map_to_connection_errors(#[case] error: PoolError) {
        let mapped = map_pool_error(error);
        assert!(matches!(mapped, UserPersistenceError::Connection { .. }));
    }

    #[rstest]
    fn not_found_maps_to_query_error() {
        let mapped = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(mapped, UserPersistenceError::query("record not found"));
    }

    #[rstest]
    fn valid_row_becomes_domain_user() {
        let stored = row("Jonas Jonaitis", "jonas@example.com");
        let id = stored.id;

        let user = row_to_user(stored).expect("valid row");

        assert_eq!(*user.id().as_uuid(), id);
        assert_eq!(user.name().as_ref(), "Jonas Jonaitis");
        assert_eq!(user.birth_date().to_string(), "1990-04-02");
    }

    #[rstest]
    #[case(row("Jonas", "jonas@example.com"))]
    #[case(row("Jonas Jonaitis", "not-an-email"))]
    fn corrupt_rows_map_to_query_errors(#[case] stored: UserRow) {
        let error = row_to_user(stored).expect_err("corrupt row");
        assert!(matches!(error, UserPersistenceError::Query { .. }));
    }
}
