//! Persistence for users, todo lists and todo items.
//!
//! # Schema: `todo`
//!
//! - `app_user` - Accounts issued by the identity provider
//! - `todo_list` - Lists, each owned by exactly one user
//! - `todo_item` - Items, each in exactly one list (`ON DELETE CASCADE`)
//! - `tower_sessions.session` - Session storage
//!
//! Lists and items carry a `version` column. Updates are conditional on the
//! version the caller loaded; a write that matches no row reports `None` so the
//! caller can tell a lost update from a vanished row.
//!
//! # Stores
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx
//! - [`InMemoryStore`] - process-local maps with the same semantics
//!
//! # Migrations
//!
//! Migrations are stored in `crates/web/migrations/` and run via:
//! ```bash
//! cargo run -p todo-app-cli -- migrate
//! ```

pub mod items;
pub mod lists;
pub mod memory;
pub mod postgres;
pub mod users;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use todo_app_core::{ItemStatus, TodoItemId, TodoListId, UserId, UserName};

use crate::models::todo::{ItemFields, ListFields, TodoItem, TodoList};
use crate::models::user::User;

pub use items::TodoItemRepository;
pub use lists::TodoListRepository;
pub use memory::InMemoryStore;
pub use postgres::PgStore;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity (or a row it references) was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique user name).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map sqlx errors for writes: unique and foreign key violations get their
/// own variants, everything else stays a database error.
pub(crate) fn map_write_error(e: sqlx::Error, conflict: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(conflict.to_owned());
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::NotFound;
        }
    }
    RepositoryError::Database(e)
}

/// Storage operations for todo lists and items.
///
/// Implementations perform no ownership checks; those belong to the access
/// services in [`crate::services`].
#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Point lookup of a list.
    async fn get_list(&self, id: TodoListId) -> Result<Option<TodoList>, RepositoryError>;

    /// All lists whose owner is `user_id`, ordered by id.
    async fn lists_for_owner(&self, user_id: &UserId) -> Result<Vec<TodoList>, RepositoryError>;

    /// Insert a list owned by `owner`.
    async fn insert_list(
        &self,
        owner: &UserId,
        fields: ListFields,
    ) -> Result<TodoList, RepositoryError>;

    /// Replace name and description if the stored version still equals
    /// `expected_version`. Returns `None` when no row matched.
    async fn update_list(
        &self,
        id: TodoListId,
        expected_version: i32,
        fields: ListFields,
    ) -> Result<Option<TodoList>, RepositoryError>;

    /// Delete a list and its items. Returns `false` if the list did not exist.
    async fn delete_list(&self, id: TodoListId) -> Result<bool, RepositoryError>;

    /// Whether a list with this id exists.
    async fn list_exists(&self, id: TodoListId) -> Result<bool, RepositoryError>;

    /// Point lookup of an item.
    async fn get_item(&self, id: TodoItemId) -> Result<Option<TodoItem>, RepositoryError>;

    /// All items in a list, ordered by id.
    async fn items_for_list(&self, list_id: TodoListId) -> Result<Vec<TodoItem>, RepositoryError>;

    /// Insert an item. Fails with [`RepositoryError::NotFound`] if the list is gone.
    async fn insert_item(&self, fields: ItemFields) -> Result<TodoItem, RepositoryError>;

    /// Replace every editable field if the stored version still equals
    /// `expected_version`. Returns `None` when no row matched.
    async fn update_item(
        &self,
        id: TodoItemId,
        expected_version: i32,
        fields: ItemFields,
    ) -> Result<Option<TodoItem>, RepositoryError>;

    /// Replace only the status, with the same version rule as [`Self::update_item`].
    async fn update_item_status(
        &self,
        id: TodoItemId,
        expected_version: i32,
        status: ItemStatus,
    ) -> Result<Option<TodoItem>, RepositoryError>;

    /// Delete an item. Returns `false` if it did not exist.
    async fn delete_item(&self, id: TodoItemId) -> Result<bool, RepositoryError>;

    /// Whether an item with this id exists.
    async fn item_exists(&self, id: TodoItemId) -> Result<bool, RepositoryError>;

    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Storage operations for identity provider accounts.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create an account. Fails with [`RepositoryError::Conflict`] if the name is taken.
    async fn create_user(
        &self,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<User, RepositoryError>;

    /// Get an account by id.
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError>;

    /// Get an account and its password hash by user name.
    async fn get_password_hash(
        &self,
        user_name: &UserName,
    ) -> Result<Option<(User, String)>, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
