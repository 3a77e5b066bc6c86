//! `PgStore` against a live database.
//!
//! Each test gets a fresh database with the migrations applied.
//!
//! ```bash
//! DATABASE_URL=postgres://localhost/todo_test \
//!     cargo test -p todo-app-web --features postgres-tests --test postgres_store
//! ```

#![cfg(feature = "postgres-tests")]
#![allow(clippy::unwrap_used)]

use sqlx::PgPool;

use todo_app_core::{ItemStatus, TodoListId, UserId, UserName};
use todo_app_web::db::{PgStore, RepositoryError, TodoStore, UserStore};
use todo_app_web::models::{ItemFields, ListFields, User};

fn list_fields(name: &str) -> ListFields {
    ListFields {
        name: name.to_string(),
        description: "description".to_string(),
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

async fn user(store: &PgStore, name: &str) -> User {
    store
        .create_user(&UserName::parse(name).unwrap(), "hash")
        .await
        .unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_list_checks_version(pool: PgPool) {
    let store = PgStore::new(pool);
    let alice = user(&store, "alice").await;
    let list = store.insert_list(&alice.id, list_fields("a")).await.unwrap();
    assert_eq!(list.version, 1);
    assert_eq!(list.user_id, alice.id);

    let updated = store
        .update_list(list.id, 1, list_fields("renamed"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.version, 2);
    assert_eq!(updated.user_id, alice.id);

    let stale = store
        .update_list(list.id, 1, list_fields("lost"))
        .await
        .unwrap();
    assert!(stale.is_none());
    assert_eq!(
        store.get_list(list.id).await.unwrap().unwrap().name,
        "renamed"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lists_for_owner_are_ordered_and_filtered(pool: PgPool) {
    let store = PgStore::new(pool);
    let alice = user(&store, "alice").await;
    let bob = user(&store, "bob").await;
    store.insert_list(&alice.id, list_fields("a1")).await.unwrap();
    store.insert_list(&bob.id, list_fields("b1")).await.unwrap();
    store.insert_list(&alice.id, list_fields("a2")).await.unwrap();

    let names: Vec<String> = store
        .lists_for_owner(&alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|list| list.name)
        .collect();
    assert_eq!(names, ["a1", "a2"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_delete_list_cascades_to_items(pool: PgPool) {
    let store = PgStore::new(pool);
    let alice = user(&store, "alice").await;
    let list = store.insert_list(&alice.id, list_fields("a")).await.unwrap();
    let milk = store.insert_item(item_fields(list.id, "milk")).await.unwrap();
    let bread = store.insert_item(item_fields(list.id, "bread")).await.unwrap();
    assert_eq!(milk.status.as_str(), "new");

    assert!(store.delete_list(list.id).await.unwrap());
    assert!(!store.item_exists(milk.id).await.unwrap());
    assert!(!store.item_exists(bread.id).await.unwrap());
    assert!(!store.list_exists(list.id).await.unwrap());
    assert!(!store.delete_list(list.id).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_foreign_key_violations_are_not_found(pool: PgPool) {
    let store = PgStore::new(pool);

    let list = store
        .insert_list(&UserId::new("ghost"), list_fields("a"))
        .await;
    assert!(matches!(list, Err(RepositoryError::NotFound)));

    let item = store
        .insert_item(item_fields(TodoListId::new(999), "milk"))
        .await;
    assert!(matches!(item, Err(RepositoryError::NotFound)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_item_checks_version_before_target_list(pool: PgPool) {
    let store = PgStore::new(pool);
    let alice = user(&store, "alice").await;
    let list = store.insert_list(&alice.id, list_fields("a")).await.unwrap();
    let item = store.insert_item(item_fields(list.id, "milk")).await.unwrap();

    let stale = store
        .update_item(item.id, 7, item_fields(TodoListId::new(999), "moved"))
        .await
        .unwrap();
    assert!(stale.is_none());

    let missing_target = store
        .update_item(item.id, 1, item_fields(TodoListId::new(999), "moved"))
        .await;
    assert!(matches!(missing_target, Err(RepositoryError::NotFound)));

    let other = store.insert_list(&alice.id, list_fields("b")).await.unwrap();
    let moved = store
        .update_item(item.id, 1, item_fields(other.id, "milk"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(moved.todo_list_id, other.id);
    assert_eq!(moved.version, 2);
    assert!(store.items_for_list(list.id).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_item_status_checks_version(pool: PgPool) {
    let store = PgStore::new(pool);
    let alice = user(&store, "alice").await;
    let list = store.insert_list(&alice.id, list_fields("a")).await.unwrap();
    let item = store.insert_item(item_fields(list.id, "milk")).await.unwrap();

    let done = ItemStatus::parse("done").unwrap();
    let updated = store
        .update_item_status(item.id, 1, done.clone())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.status, done);
    assert_eq!(updated.name, "milk");
    assert!(
        store
            .update_item_status(item.id, 1, done)
            .await
            .unwrap()
            .is_none()
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_user_accounts(pool: PgPool) {
    let store = PgStore::new(pool);
    let alice = user(&store, "alice").await;

    let duplicate = store
        .create_user(&UserName::parse("alice").unwrap(), "other")
        .await;
    assert!(matches!(duplicate, Err(RepositoryError::Conflict(_))));

    assert_eq!(store.get_user(&alice.id).await.unwrap(), Some(alice.clone()));
    let (found, hash) = store
        .get_password_hash(&UserName::parse("alice").unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, alice.id);
    assert_eq!(hash, "hash");
    assert!(store.ping().await.is_ok());
}
