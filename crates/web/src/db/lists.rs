//! Todo list repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use todo_app_core::{TodoListId, UserId};

use super::{RepositoryError, map_write_error};
use crate::models::todo::{ListFields, TodoList};

const LIST_COLUMNS: &str = "id, name, description, user_id, version, created_at, updated_at";

/// Internal row type for `PostgreSQL` list queries.
#[derive(Debug, sqlx::FromRow)]
struct TodoListRow {
    id: i32,
    name: String,
    description: String,
    user_id: String,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TodoListRow> for TodoList {
    fn from(row: TodoListRow) -> Self {
        Self {
            id: TodoListId::new(row.id),
            name: row.name,
            description: row.description,
            user_id: UserId::new(row.user_id),
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Repository for todo list database operations.
pub struct TodoListRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TodoListRepository<'a> {
    /// Create a new list repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a list by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: TodoListId) -> Result<Option<TodoList>, RepositoryError> {
        let row = sqlx::query_as::<_, TodoListRow>(&format!(
            "SELECT {LIST_COLUMNS} FROM todo.todo_list WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(TodoList::from))
    }

    /// Get every list owned by a user, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_owner(&self, user_id: &UserId) -> Result<Vec<TodoList>, RepositoryError> {
        let rows = sqlx::query_as::<_, TodoListRow>(&format!(
            "SELECT {LIST_COLUMNS} FROM todo.todo_list WHERE user_id = $1 ORDER BY id ASC"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(TodoList::from).collect())
    }

    /// Create a list owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the owner account does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        owner: &UserId,
        fields: &ListFields,
    ) -> Result<TodoList, RepositoryError> {
        let row = sqlx::query_as::<_, TodoListRow>(&format!(
            r"
            INSERT INTO todo.todo_list (name, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING {LIST_COLUMNS}
            "
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(owner)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "list already exists"))?;

        Ok(row.into())
    }

    /// Update name and description if the row is still at `expected_version`.
    ///
    /// Returns `None` if no row has this id and version.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: TodoListId,
        expected_version: i32,
        fields: &ListFields,
    ) -> Result<Option<TodoList>, RepositoryError> {
        let row = sqlx::query_as::<_, TodoListRow>(&format!(
            r"
            UPDATE todo.todo_list
            SET name = $3,
                description = $4,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING {LIST_COLUMNS}
            "
        ))
        .bind(id)
        .bind(expected_version)
        .bind(&fields.name)
        .bind(&fields.description)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(TodoList::from))
    }

    /// Delete a list. Items go with it through `ON DELETE CASCADE`.
    ///
    /// # Returns
    ///
    /// Returns `true` if the list was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: TodoListId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM todo.todo_list WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether a list exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: TodoListId) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM todo.todo_list WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }
}
