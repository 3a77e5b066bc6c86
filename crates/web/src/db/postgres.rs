//! `PostgreSQL` implementation of the store traits.

use async_trait::async_trait;
use sqlx::PgPool;

use todo_app_core::{ItemStatus, TodoItemId, TodoListId, UserId, UserName};

use super::{
    RepositoryError, TodoItemRepository, TodoListRepository, TodoStore, UserRepository,
    UserStore,
};
use crate::models::todo::{ItemFields, ListFields, TodoItem, TodoList};
use crate::models::user::User;

/// Store backed by a `PostgreSQL` pool.
///
/// Each call is a single statement, auto-committed.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    const fn lists(&self) -> TodoListRepository<'_> {
        TodoListRepository::new(&self.pool)
    }

    const fn items(&self) -> TodoItemRepository<'_> {
        TodoItemRepository::new(&self.pool)
    }

    const fn users(&self) -> UserRepository<'_> {
        UserRepository::new(&self.pool)
    }
}

#[async_trait]
impl TodoStore for PgStore {
    async fn get_list(&self, id: TodoListId) -> Result<Option<TodoList>, RepositoryError> {
        self.lists().get_by_id(id).await
    }

    async fn lists_for_owner(&self, user_id: &UserId) -> Result<Vec<TodoList>, RepositoryError> {
        self.lists().get_by_owner(user_id).await
    }

    async fn insert_list(
        &self,
        owner: &UserId,
        fields: ListFields,
    ) -> Result<TodoList, RepositoryError> {
        self.lists().create(owner, &fields).await
    }

    async fn update_list(
        &self,
        id: TodoListId,
        expected_version: i32,
        fields: ListFields,
    ) -> Result<Option<TodoList>, RepositoryError> {
        self.lists().update(id, expected_version, &fields).await
    }

    async fn delete_list(&self, id: TodoListId) -> Result<bool, RepositoryError> {
        self.lists().delete(id).await
    }

    async fn list_exists(&self, id: TodoListId) -> Result<bool, RepositoryError> {
        self.lists().exists(id).await
    }

    async fn get_item(&self, id: TodoItemId) -> Result<Option<TodoItem>, RepositoryError> {
        self.items().get_by_id(id).await
    }

    async fn items_for_list(&self, list_id: TodoListId) -> Result<Vec<TodoItem>, RepositoryError> {
        self.items().get_by_list(list_id).await
    }

    async fn insert_item(&self, fields: ItemFields) -> Result<TodoItem, RepositoryError> {
        self.items().create(&fields).await
    }

    async fn update_item(
        &self,
        id: TodoItemId,
        expected_version: i32,
        fields: ItemFields,
    ) -> Result<Option<TodoItem>, RepositoryError> {
        self.items().update(id, expected_version, &fields).await
    }

    async fn update_item_status(
        &self,
        id: TodoItemId,
        expected_version: i32,
        status: ItemStatus,
    ) -> Result<Option<TodoItem>, RepositoryError> {
        self.items()
            .update_status(id, expected_version, &status)
            .await
    }

    async fn delete_item(&self, id: TodoItemId) -> Result<bool, RepositoryError> {
        self.items().delete(id).await
    }

    async fn item_exists(&self, id: TodoItemId) -> Result<bool, RepositoryError> {
        self.items().exists(id).await
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(
        &self,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        self.users()
            .create_with_password(user_name, password_hash)
            .await
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        self.users().get_by_id(id).await
    }

    async fn get_password_hash(
        &self,
        user_name: &UserName,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        self.users().get_password_hash(user_name).await
    }
}
