//! List access service.

use tracing::{debug, instrument};

use todo_app_core::{TodoListId, UserId};

use super::AccessError;
use crate::db::TodoStore;
use crate::models::todo::{ListFields, TodoList};

/// Ownership-checked operations on todo lists.
pub struct ListAccessService<'a> {
    store: &'a dyn TodoStore,
}

impl<'a> ListAccessService<'a> {
    /// Create a new list access service.
    #[must_use]
    pub const fn new(store: &'a dyn TodoStore) -> Self {
        Self { store }
    }

    /// Get a list owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if the list is missing or owned by someone else.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list_for_user(
        &self,
        user_id: &UserId,
        list_id: TodoListId,
    ) -> Result<TodoList, AccessError> {
        if user_id.is_anonymous() {
            debug!("anonymous caller owns no lists");
            return Err(AccessError::NotFound);
        }
        match self.store.get_list(list_id).await? {
            Some(list) if &list.user_id == user_id => Ok(list),
            Some(_) => {
                debug!("list owned by another user");
                Err(AccessError::NotFound)
            }
            None => {
                debug!("list does not exist");
                Err(AccessError::NotFound)
            }
        }
    }

    /// Every list owned by `user_id`, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::Repository` if the store fails.
    pub async fn list_all_for_user(&self, user_id: &UserId) -> Result<Vec<TodoList>, AccessError> {
        if user_id.is_anonymous() {
            return Ok(Vec::new());
        }
        Ok(self.store.lists_for_owner(user_id).await?)
    }

    /// Create a list owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if `user_id` is not a known account.
    #[instrument(skip(self, fields), fields(user_id = %user_id))]
    pub async fn create_list(
        &self,
        user_id: &UserId,
        fields: ListFields,
    ) -> Result<TodoList, AccessError> {
        let list = self.store.insert_list(user_id, fields).await?;
        debug!(list_id = %list.id, "list created");
        Ok(list)
    }

    /// Update name and description of a list owned by `user_id`.
    ///
    /// The write only applies if the list is still at `expected_version`, or
    /// at the version just loaded when the client sent none.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if the list is missing, not owned, or
    /// deleted concurrently.
    /// Returns `AccessError::Conflict` if the list changed since it was loaded.
    #[instrument(skip(self, fields), fields(user_id = %user_id))]
    pub async fn update_list(
        &self,
        user_id: &UserId,
        list_id: TodoListId,
        fields: ListFields,
        expected_version: Option<i32>,
    ) -> Result<TodoList, AccessError> {
        let current = self.list_for_user(user_id, list_id).await?;
        let expected = expected_version.unwrap_or(current.version);

        match self.store.update_list(list_id, expected, fields).await? {
            Some(updated) => Ok(updated),
            None => Err(self.lost_update(list_id).await?),
        }
    }

    /// Delete a list owned by `user_id`, together with its items.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotFound` if the list is missing or not owned.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn delete_list(
        &self,
        user_id: &UserId,
        list_id: TodoListId,
    ) -> Result<TodoList, AccessError> {
        let list = self.list_for_user(user_id, list_id).await?;
        if !self.store.delete_list(list_id).await? {
            debug!("list deleted concurrently");
            return Err(AccessError::NotFound);
        }
        Ok(list)
    }

    /// Classify a conditional write that matched no row.
    async fn lost_update(&self, list_id: TodoListId) -> Result<AccessError, AccessError> {
        if self.store.list_exists(list_id).await? {
            debug!(list_id = %list_id, "list version changed");
            Ok(AccessError::Conflict)
        } else {
            debug!(list_id = %list_id, "list deleted concurrently");
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

    fn fields(name: &str) -> ListFields {
        ListFields {
            name: name.to_string(),
            description: "description".to_string(),
        }
    }

    async fn user(store: &InMemoryStore, name: &str) -> UserId {
        store
            .create_user(&UserName::parse(name).unwrap(), "hash")
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_list_for_user_hides_other_owners() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let lists = ListAccessService::new(&store);

        let list = lists.create_list(&alice, fields("Groceries")).await.unwrap();
        assert_eq!(list.user_id, alice);
        assert!(lists.list_for_user(&alice, list.id).await.is_ok());
        assert!(matches!(
            lists.list_for_user(&bob, list.id).await,
            Err(AccessError::NotFound)
        ));
        assert!(matches!(
            lists.list_for_user(&UserId::anonymous(), list.id).await,
            Err(AccessError::NotFound)
        ));
        assert!(matches!(
            lists.list_for_user(&alice, TodoListId::new(99)).await,
            Err(AccessError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_anonymous_caller_sees_nothing() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let lists = ListAccessService::new(&store);
        let list = lists.create_list(&alice, fields("Groceries")).await.unwrap();

        let anonymous = UserId::anonymous();
        assert!(lists.list_all_for_user(&anonymous).await.unwrap().is_empty());
        assert!(matches!(
            lists.list_for_user(&anonymous, list.id).await,
            Err(AccessError::NotFound)
        ));
        assert!(matches!(
            lists.delete_list(&anonymous, list.id).await,
            Err(AccessError::NotFound)
        ));
        assert!(lists.list_for_user(&alice, list.id).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_all_for_user_only_returns_own_lists() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let lists = ListAccessService::new(&store);

        lists.create_list(&alice, fields("a1")).await.unwrap();
        lists.create_list(&bob, fields("b1")).await.unwrap();
        lists.create_list(&alice, fields("a2")).await.unwrap();

        let names: Vec<_> = lists
            .list_all_for_user(&alice)
            .await
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();
        assert_eq!(names, ["a1", "a2"]);
        assert!(
            lists
                .list_all_for_user(&UserId::anonymous())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_update_list_keeps_owner() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let lists = ListAccessService::new(&store);
        let list = lists.create_list(&alice, fields("a")).await.unwrap();

        let updated = lists
            .update_list(&alice, list.id, fields("renamed"), None)
            .await
            .unwrap();
        assert_eq!(updated.name, "renamed");
        assert_eq!(updated.user_id, alice);
        assert_eq!(updated.version, list.version + 1);
    }

    #[tokio::test]
    async fn test_update_list_by_other_user_is_not_found() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let lists = ListAccessService::new(&store);
        let list = lists.create_list(&alice, fields("a")).await.unwrap();

        assert!(matches!(
            lists.update_list(&bob, list.id, fields("x"), None).await,
            Err(AccessError::NotFound)
        ));
        assert_eq!(
            lists.list_for_user(&alice, list.id).await.unwrap().name,
            "a"
        );
    }

    #[tokio::test]
    async fn test_stale_version_conflicts() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let lists = ListAccessService::new(&store);
        let list = lists.create_list(&alice, fields("a")).await.unwrap();

        lists
            .update_list(&alice, list.id, fields("first"), Some(list.version))
            .await
            .unwrap();
        let second = lists
            .update_list(&alice, list.id, fields("second"), Some(list.version))
            .await;
        assert!(matches!(second, Err(AccessError::Conflict)));
        assert_eq!(
            lists.list_for_user(&alice, list.id).await.unwrap().name,
            "first"
        );
    }

    #[tokio::test]
    async fn test_update_deleted_list_is_not_found() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let lists = ListAccessService::new(&store);
        let list = lists.create_list(&alice, fields("a")).await.unwrap();

        lists.delete_list(&alice, list.id).await.unwrap();
        assert!(matches!(
            lists
                .update_list(&alice, list.id, fields("x"), Some(list.version))
                .await,
            Err(AccessError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_list_by_other_user_is_not_found() {
        let store = InMemoryStore::new();
        let alice = user(&store, "alice").await;
        let bob = user(&store, "bob").await;
        let lists = ListAccessService::new(&store);
        let list = lists.create_list(&alice, fields("a")).await.unwrap();

        assert!(matches!(
            lists.delete_list(&bob, list.id).await,
            Err(AccessError::NotFound)
        ));
        assert!(lists.list_for_user(&alice, list.id).await.is_ok());
    }
}
