//! Todo item repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use todo_app_core::{ItemStatus, TodoItemId, TodoListId};

use super::{RepositoryError, map_write_error};
use crate::models::todo::{ItemFields, TodoItem};

const ITEM_COLUMNS: &str =
    "id, name, description, status, todo_list_id, version, created_at, updated_at";

/// Internal row type for `PostgreSQL` item queries.
#[derive(Debug, sqlx::FromRow)]
struct TodoItemRow {
    id: i32,
    name: String,
    description: String,
    status: String,
    todo_list_id: i32,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TodoItemRow> for TodoItem {
    type Error = RepositoryError;

    fn try_from(row: TodoItemRow) -> Result<Self, Self::Error> {
        let status = ItemStatus::parse(&row.status).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid status in database: {e}"))
        })?;

        Ok(Self {
            id: TodoItemId::new(row.id),
            name: row.name,
            description: row.description,
            status,
            todo_list_id: TodoListId::new(row.todo_list_id),
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Repository for todo item database operations.
pub struct TodoItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> TodoItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored status is invalid.
    pub async fn get_by_id(&self, id: TodoItemId) -> Result<Option<TodoItem>, RepositoryError> {
        let row = sqlx::query_as::<_, TodoItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM todo.todo_item WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(TodoItem::try_from).transpose()
    }

    /// Get every item in a list, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if any stored status is invalid.
    pub async fn get_by_list(&self, list_id: TodoListId) -> Result<Vec<TodoItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, TodoItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM todo.todo_item WHERE todo_list_id = $1 ORDER BY id ASC"
        ))
        .bind(list_id)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TodoItem::try_from).collect()
    }

    /// Create an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the parent list does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, fields: &ItemFields) -> Result<TodoItem, RepositoryError> {
        let row = sqlx::query_as::<_, TodoItemRow>(&format!(
            r"
            INSERT INTO todo.todo_item (name, description, status, todo_list_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.status)
        .bind(fields.todo_list_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_write_error(e, "item already exists"))?;

        row.try_into()
    }

    /// Update every editable field if the row is still at `expected_version`.
    ///
    /// Returns `None` if no row has this id and version.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the target list does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: TodoItemId,
        expected_version: i32,
        fields: &ItemFields,
    ) -> Result<Option<TodoItem>, RepositoryError> {
        let row = sqlx::query_as::<_, TodoItemRow>(&format!(
            r"
            UPDATE todo.todo_item
            SET name = $3,
                description = $4,
                status = $5,
                todo_list_id = $6,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(id)
        .bind(expected_version)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.status)
        .bind(fields.todo_list_id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_write_error(e, "item already exists"))?;

        row.map(TodoItem::try_from).transpose()
    }

    /// Update only the status if the row is still at `expected_version`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_status(
        &self,
        id: TodoItemId,
        expected_version: i32,
        status: &ItemStatus,
    ) -> Result<Option<TodoItem>, RepositoryError> {
        let row = sqlx::query_as::<_, TodoItemRow>(&format!(
            r"
            UPDATE todo.todo_item
            SET status = $3,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING {ITEM_COLUMNS}
            "
        ))
        .bind(id)
        .bind(expected_version)
        .bind(status)
        .fetch_optional(self.pool)
        .await?;

        row.map(TodoItem::try_from).transpose()
    }

    /// Delete an item.
    ///
    /// # Returns
    ///
    /// Returns `true` if the item was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: TodoItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM todo.todo_item WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Check whether an item exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exists(&self, id: TodoItemId) -> Result<bool, RepositoryError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM todo.todo_item WHERE id = $1)")
                .bind(id)
                .fetch_one(self.pool)
                .await?;

        Ok(exists)
    }
}
