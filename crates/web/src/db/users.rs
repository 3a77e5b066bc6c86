//! User repository for database operations.
//!
//! This module provides database access for identity provider accounts.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use todo_app_core::{UserId, UserName};

use super::{RepositoryError, map_write_error};
use crate::models::user::User;

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: String,
    user_name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let user_name = UserName::parse(&row.user_name).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid user name in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            user_name,
            created_at: row.created_at,
        })
    }
}

/// Row type for the login query, which also reads the password hash.
#[derive(Debug, sqlx::FromRow)]
struct UserPasswordRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored user name is invalid.
    pub async fn get_by_id(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, user_name, created_at
            FROM todo.app_user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Get a user by their login name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user_name(
        &self,
        user_name: &UserName,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(
            r"
            SELECT id, user_name, created_at
            FROM todo.app_user
            WHERE user_name = $1
            ",
        )
        .bind(user_name)
        .fetch_optional(self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    /// Create a new user with a user name and password hash.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the user name already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_with_password(
        &self,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let id = UserId::new(Uuid::new_v4().to_string());

        let row = sqlx::query_as::<_, UserRow>(
            r"
            INSERT INTO todo.app_user (id, user_name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, user_name, created_at
            ",
        )
        .bind(&id)
        .bind(user_name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "user name already exists"))?;

        row.try_into()
    }

    /// Get a user's password hash by user name.
    ///
    /// Returns `None` if the user doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        user_name: &UserName,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserPasswordRow>(
            r"
            SELECT id, user_name, created_at, password_hash
            FROM todo.app_user
            WHERE user_name = $1
            ",
        )
        .bind(user_name)
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let user = User::try_from(row.user)?;
        Ok(Some((user, row.password_hash)))
    }
}
