//! In-memory store for development and tests.
//!
//! All tables live behind a single lock, so every operation is atomic with
//! respect to the others, matching the single-statement behavior of
//! [`super::PgStore`].

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use todo_app_core::{ItemStatus, TodoItemId, TodoListId, UserId, UserName};

use super::{RepositoryError, TodoStore, UserStore};
use crate::models::todo::{ItemFields, ListFields, TodoItem, TodoList};
use crate::models::user::User;

#[derive(Default)]
struct Tables {
    lists: BTreeMap<TodoListId, TodoList>,
    items: BTreeMap<TodoItemId, TodoItem>,
    users: BTreeMap<UserId, (User, String)>,
    next_list_id: i32,
    next_item_id: i32,
}

impl Tables {
    fn allocate_list_id(&mut self) -> TodoListId {
        self.next_list_id += 1;
        TodoListId::new(self.next_list_id)
    }

    fn allocate_item_id(&mut self) -> TodoItemId {
        self.next_item_id += 1;
        TodoItemId::new(self.next_item_id)
    }
}

/// Store holding everything in process memory. Cloning shares the data.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    /// Create an empty store. Ids start at 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TodoStore for InMemoryStore {
    async fn get_list(&self, id: TodoListId) -> Result<Option<TodoList>, RepositoryError> {
        Ok(self.tables.read().await.lists.get(&id).cloned())
    }

    async fn lists_for_owner(&self, user_id: &UserId) -> Result<Vec<TodoList>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .lists
            .values()
            .filter(|list| &list.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_list(
        &self,
        owner: &UserId,
        fields: ListFields,
    ) -> Result<TodoList, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(owner) {
            return Err(RepositoryError::NotFound);
        }

        let now = Utc::now();
        let list = TodoList {
            id: tables.allocate_list_id(),
            name: fields.name,
            description: fields.description,
            user_id: owner.clone(),
            version: 1,
            created_at: now,
            updated_at: now,
        };
        tables.lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn update_list(
        &self,
        id: TodoListId,
        expected_version: i32,
        fields: ListFields,
    ) -> Result<Option<TodoList>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(list) = tables
            .lists
            .get_mut(&id)
            .filter(|list| list.version == expected_version)
        else {
            return Ok(None);
        };

        list.name = fields.name;
        list.description = fields.description;
        list.version += 1;
        list.updated_at = Utc::now();
        Ok(Some(list.clone()))
    }

    async fn delete_list(&self, id: TodoListId) -> Result<bool, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.lists.remove(&id).is_none() {
            return Ok(false);
        }
        tables.items.retain(|_, item| item.todo_list_id != id);
        Ok(true)
    }

    async fn list_exists(&self, id: TodoListId) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.lists.contains_key(&id))
    }

    async fn get_item(&self, id: TodoItemId) -> Result<Option<TodoItem>, RepositoryError> {
        Ok(self.tables.read().await.items.get(&id).cloned())
    }

    async fn items_for_list(&self, list_id: TodoListId) -> Result<Vec<TodoItem>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .items
            .values()
            .filter(|item| item.todo_list_id == list_id)
            .cloned()
            .collect())
    }

    async fn insert_item(&self, fields: ItemFields) -> Result<TodoItem, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.lists.contains_key(&fields.todo_list_id) {
            return Err(RepositoryError::NotFound);
        }

        let now = Utc::now();
        let item = TodoItem {
            id: tables.allocate_item_id(),
            name: fields.name,
            description: fields.description,
            status: fields.status,
            todo_list_id: fields.todo_list_id,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        tables.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn update_item(
        &self,
        id: TodoItemId,
        expected_version: i32,
        fields: ItemFields,
    ) -> Result<Option<TodoItem>, RepositoryError> {
        let mut tables = self.tables.write().await;
        // Row match first, then the foreign key, as the UPDATE statement does
        let current = tables
            .items
            .get(&id)
            .is_some_and(|item| item.version == expected_version);
        if !current {
            return Ok(None);
        }
        if !tables.lists.contains_key(&fields.todo_list_id) {
            return Err(RepositoryError::NotFound);
        }
        let Some(item) = tables.items.get_mut(&id) else {
            return Ok(None);
        };

        item.name = fields.name;
        item.description = fields.description;
        item.status = fields.status;
        item.todo_list_id = fields.todo_list_id;
        item.version += 1;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn update_item_status(
        &self,
        id: TodoItemId,
        expected_version: i32,
        status: ItemStatus,
    ) -> Result<Option<TodoItem>, RepositoryError> {
        let mut tables = self.tables.write().await;
        let Some(item) = tables
            .items
            .get_mut(&id)
            .filter(|item| item.version == expected_version)
        else {
            return Ok(None);
        };

        item.status = status;
        item.version += 1;
        item.updated_at = Utc::now();
        Ok(Some(item.clone()))
    }

    async fn delete_item(&self, id: TodoItemId) -> Result<bool, RepositoryError> {
        Ok(self.tables.write().await.items.remove(&id).is_some())
    }

    async fn item_exists(&self, id: TodoItemId) -> Result<bool, RepositoryError> {
        Ok(self.tables.read().await.items.contains_key(&id))
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn create_user(
        &self,
        user_name: &UserName,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables
            .users
            .values()
            .any(|(user, _)| user.user_name == *user_name)
        {
            return Err(RepositoryError::Conflict(
                "user name already exists".to_owned(),
            ));
        }

        let user = User {
            id: UserId::new(Uuid::new_v4().to_string()),
            user_name: user_name.clone(),
            created_at: Utc::now(),
        };
        tables
            .users
            .insert(user.id.clone(), (user.clone(), password_hash.to_owned()));
        Ok(user)
    }

    async fn get_user(&self, id: &UserId) -> Result<Option<User>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(id).map(|(user, _)| user.clone()))
    }

    async fn get_password_hash(
        &self,
        user_name: &UserName,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|(user, _)| user.user_name == *user_name)
            .cloned())
    }
}
