//! Item access service.
//!
//! Items have no owner column. Every check resolves the parent list through
//! [`ListAccessService`], so an item is visible exactly when its list is.

use tracing::{debug, instrument};

use todo_app_core::{ItemStatus, TodoItemId, TodoListId, UserId};

use super::{AccessError, ListAccessService};
use crate::db::TodoStore;
use crate::models::todo::{ItemFields, TodoItem, TodoList};

/// Ownership-checked operations on todo items.
pub struct ItemAccessService<'a> {
    store: &'a dyn TodoStore,
    lists: ListAccessService<'a>,
}

impl<'a> ItemAccessService<'a> {
    /// Create a new item access service.
    #[must_use]
    pub const fn new(store: &'a dyn TodoStore) -> Self {
        Self {
            store,
            lists: ListAccessService::new(store),
        }
    }

    /// Get an item whose parent list is owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if the item or its list is missing, or
    /// the list is owned by someone else.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn item_for_user(
        &self,
        user_id: &UserId,
        item_id: TodoItemId,
    ) -> Result<TodoItem, AccessError> {
        let Some(item) = self.store.get_item(item_id).await? else {
            debug!("item does not exist");
            return Err(AccessError::NotFound);
        };
        self.lists
            .list_for_user(user_id, item.todo_list_id)
            .await?;
        Ok(item)
    }

    /// A list owned by `user_id` together with its items, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if `list_id` is not positive, or the
    /// list is missing or not owned.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn items_for_list(
        &self,
        user_id: &UserId,
        list_id: TodoListId,
    ) -> Result<(TodoList, Vec<TodoItem>), AccessError> {
        if list_id.as_i32() <= 0 {
            return Err(AccessError::NotFound);
        }
        let list = self.lists.list_for_user(user_id, list_id).await?;
        let items = self.store.items_for_list(list_id).await?;
        Ok((list, items))
    }

    /// Create an item in a list owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if the target list is missing or not owned.
    #[instrument(skip(self, fields), fields(user_id = %user_id, list_id = %fields.todo_list_id))]
    pub async fn create_item(
        &self,
        user_id: &UserId,
        fields: ItemFields,
    ) -> Result<TodoItem, AccessError> {
        self.lists
            .list_for_user(user_id, fields.todo_list_id)
            .await?;
        let item = self.store.insert_item(fields).await?;
        debug!(item_id = %item.id, "item created");
        Ok(item)
    }

    /// Update every editable field of an item owned by `user_id`.
    ///
    /// Moving the item to another list requires owning that list too.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if the item is missing or not owned, or
    /// the target list is missing or not owned.
    /// Returns `AccessError::Conflict` if the item changed since it was loaded.
    #[instrument(skip(self, fields), fields(user_id = %user_id))]
    pub async fn update_item(
        &self,
        user_id: &UserId,
        item_id: TodoItemId,
        fields: ItemFields,
        expected_version: Option<i32>,
    ) -> Result<TodoItem, AccessError> {
        let current = self.item_for_user(user_id, item_id).await?;
        if fields.todo_list_id != current.todo_list_id {
            debug!(target_list_id = %fields.todo_list_id, "moving item");
            self.lists
                .list_for_user(user_id, fields.todo_list_id)
                .await?;
        }
        let expected = expected_version.unwrap_or(current.version);

        match self.store.update_item(item_id, expected, fields).await? {
            Some(updated) => Ok(updated),
            None => Err(self.lost_update(item_id).await?),
        }
    }

    /// Change only the status of an item owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if the item is missing or not owned.
    /// Returns `AccessError::Conflict` if the item changed since it was loaded.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn update_item_status(
        &self,
        user_id: &UserId,
        item_id: TodoItemId,
        status: ItemStatus,
        expected_version: Option<i32>,
    ) -> Result<TodoItem, AccessError> {
        let current = self.item_for_user(user_id, item_id).await?;
        let expected = expected_version.unwrap_or(current.version);

        match self
            .store
            .update_item_status(item_id, expected, status)
            .await?
        {
            Some(updated) => Ok(updated),
            None => Err(self.lost_update(item_id).await?),
        }
    }

    /// Delete an item owned by `user_id`. Returns the deleted item.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if the item is missing or not owned.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete_item(
        &self,
        user_id: &UserId,
        item_id: TodoItemId,
    ) -> Result<TodoItem, AccessError> {
        let item = self.item_for_user(user_id, item_id).await?;
        if !self.store.delete_item(item_id).await? {
            debug!("item deleted concurrently");
            return Err(AccessError::NotFound);
        }
        Ok(item)
    }

    async fn lost_update(&self, item_id: TodoItemId) -> Result<AccessError, AccessError> {
        if self.store.item_exists(item_id).await? {
            debug!(item_id = %item_id, "item version changed");
            Ok(AccessError::Conflict)
        } else {
            debug!(item_id = %item_id, "item deleted concurrently");
            Ok(AccessError::NotFound)
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use todo_app_core::UserName;

    use super::*;
    use crate::db::{InMemoryStore, UserStore};
    use crate::models::todo::ListFields;

    struct Fixture {
        store: InMemoryStore,
        alice: UserId,
        bob: UserId,
    }

    impl Fixture {
        async fn new() -> Self {
            let store = InMemoryStore::new();
            let alice = store
                .create_user(&UserName::parse("alice").unwrap(), "hash")
                .await
                .unwrap()
                .id;
            let bob = store
                .create_user(&UserName::parse("bob").unwrap(), "hash")
                .await
                .unwrap()
                .id;
            Self { store, alice, bob }
        }

        fn items(&self) -> ItemAccessService<'_> {
            ItemAccessService::new(&self.store)
        }

        async fn list(&self, owner: &UserId, name: &str) -> TodoList {
            ListAccessService::new(&self.store)
                .create_list(
                    owner,
                    ListFields {
                        name: name.to_string(),
                        description: "description".to_string(),
                    },
                )
                .await
                .unwrap()
        }
    }

    fn item_fields(list_id: TodoListId, name: &str) -> ItemFields {
        ItemFields {
            todo_list_id: list_id,
            name: name.to_string(),
            description: "description".to_string(),
            status: ItemStatus::default(),
        }
    }

    #[tokio::test]
    async fn test_groceries_scenario() {
        let fx = Fixture::new().await;
        let list = fx.list(&fx.alice, "Groceries").await;
        assert_eq!(list.id, TodoListId::new(1));

        let item = fx
            .items()
            .create_item(&fx.alice, item_fields(list.id, "Milk"))
            .await
            .unwrap();
        assert_eq!(item.id, TodoItemId::new(1));
        assert_eq!(item.status.as_str(), "new");

        let done = fx
            .items()
            .update_item_status(
                &fx.alice,
                item.id,
                ItemStatus::parse("done").unwrap(),
                None,
            )
            .await
            .unwrap();
        assert_eq!(done.status.as_str(), "done");

        assert!(matches!(
            fx.items().item_for_user(&fx.bob, item.id).await,
            Err(AccessError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_items_for_list_rejects_non_positive_id() {
        let fx = Fixture::new().await;
        for id in [0, -1] {
            assert!(matches!(
                fx.items()
                    .items_for_list(&fx.alice, TodoListId::new(id))
                    .await,
                Err(AccessError::NotFound)
            ));
        }
    }

    #[tokio::test]
    async fn test_items_for_list_returns_list_and_items() {
        let fx = Fixture::new().await;
        let list = fx.list(&fx.alice, "Groceries").await;
        let other = fx.list(&fx.alice, "Chores").await;
        fx.items()
            .create_item(&fx.alice, item_fields(list.id, "Milk"))
            .await
            .unwrap();
        fx.items()
            .create_item(&fx.alice, item_fields(other.id, "Dishes"))
            .await
            .unwrap();
        fx.items()
            .create_item(&fx.alice, item_fields(list.id, "Eggs"))
            .await
            .unwrap();

        let (found, items) = fx.items().items_for_list(&fx.alice, list.id).await.unwrap();
        assert_eq!(found.id, list.id);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Milk", "Eggs"]);

        assert!(matches!(
            fx.items().items_for_list(&fx.bob, list.id).await,
            Err(AccessError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_create_item_in_foreign_list_is_not_found() {
        let fx = Fixture::new().await;
        let list = fx.list(&fx.alice, "Groceries").await;

        assert!(matches!(
            fx.items()
                .create_item(&fx.bob, item_fields(list.id, "Sneaky"))
                .await,
            Err(AccessError::NotFound)
        ));
        assert!(fx.store.items_for_list(list.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_foreign_item_leaves_it_in_place() {
        let fx = Fixture::new().await;
        let list = fx.list(&fx.alice, "Groceries").await;
        let item = fx
            .items()
            .create_item(&fx.alice, item_fields(list.id, "Milk"))
            .await
            .unwrap();

        assert!(matches!(
            fx.items().delete_item(&fx.bob, item.id).await,
            Err(AccessError::NotFound)
        ));
        assert!(fx.items().item_for_user(&fx.alice, item.id).await.is_ok());

        let deleted = fx.items().delete_item(&fx.alice, item.id).await.unwrap();
        assert_eq!(deleted.id, item.id);
        assert!(matches!(
            fx.items().item_for_user(&fx.alice, item.id).await,
            Err(AccessError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_move_item_requires_owning_target_list() {
        let fx = Fixture::new().await;
        let mine = fx.list(&fx.alice, "Mine").await;
        let also_mine = fx.list(&fx.alice, "Also mine").await;
        let theirs = fx.list(&fx.bob, "Theirs").await;
        let item = fx
            .items()
            .create_item(&fx.alice, item_fields(mine.id, "Milk"))
            .await
            .unwrap();

        assert!(matches!(
            fx.items()
                .update_item(&fx.alice, item.id, item_fields(theirs.id, "Milk"), None)
                .await,
            Err(AccessError::NotFound)
        ));
        assert!(fx.store.items_for_list(theirs.id).await.unwrap().is_empty());

        let moved = fx
            .items()
            .update_item(&fx.alice, item.id, item_fields(also_mine.id, "Milk"), None)
            .await
            .unwrap();
        assert_eq!(moved.todo_list_id, also_mine.id);
    }

    #[tokio::test]
    async fn test_concurrent_updates_conflict() {
        let fx = Fixture::new().await;
        let list = fx.list(&fx.alice, "Groceries").await;
        let item = fx
            .items()
            .create_item(&fx.alice, item_fields(list.id, "Milk"))
            .await
            .unwrap();

        fx.items()
            .update_item(
                &fx.alice,
                item.id,
                item_fields(list.id, "Oat milk"),
                Some(item.version),
            )
            .await
            .unwrap();
        let second = fx
            .items()
            .update_item_status(
                &fx.alice,
                item.id,
                ItemStatus::parse("done").unwrap(),
                Some(item.version),
            )
            .await;
        assert!(matches!(second, Err(AccessError::Conflict)));
    }

    #[tokio::test]
    async fn test_deleting_list_removes_all_items() {
        let fx = Fixture::new().await;
        let list = fx.list(&fx.alice, "Groceries").await;
        let mut ids = Vec::new();
        for name in ["Milk", "Eggs", "Bread"] {
            let item = fx
                .items()
                .create_item(&fx.alice, item_fields(list.id, name))
                .await
                .unwrap();
            ids.push(item.id);
        }

        ListAccessService::new(&fx.store)
            .delete_list(&fx.alice, list.id)
            .await
            .unwrap();
        for id in ids {
            assert!(matches!(
                fx.items().item_for_user(&fx.alice, id).await,
                Err(AccessError::NotFound)
            ));
        }
    }

    #[tokio::test]
    async fn test_update_deleted_item_is_not_found() {
        let fx = Fixture::new().await;
        let list = fx.list(&fx.alice, "Groceries").await;
        let item = fx
            .items()
            .create_item(&fx.alice, item_fields(list.id, "Milk"))
            .await
            .unwrap();
        fx.items().delete_item(&fx.alice, item.id).await.unwrap();

        assert!(matches!(
            fx.items()
                .update_item(&fx.alice, item.id, item_fields(list.id, "x"), None)
                .await,
            Err(AccessError::NotFound)
        ));
    }
}
