//! Todo list and item domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use todo_app_core::{ItemStatus, TodoItemId, TodoListId, UserId};

/// A todo list (domain type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoList {
    /// Unique list ID.
    pub id: TodoListId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Owning user, fixed at creation.
    pub user_id: UserId,
    /// Optimistic concurrency marker, incremented by every update.
    pub version: i32,
    /// When the list was created.
    pub created_at: DateTime<Utc>,
    /// When the list was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A todo item (domain type).
///
/// Items have no owner of their own: the owner is the parent list's `user_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    /// Unique item ID.
    pub id: TodoItemId,
    /// Display name.
    pub name: String,
    /// Free-form description.
    pub description: String,
    /// Current status, `"new"` unless changed.
    pub status: ItemStatus,
    /// Parent list.
    pub todo_list_id: TodoListId,
    /// Optimistic concurrency marker, incremented by every update.
    pub version: i32,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Editable fields of a list.
///
/// There is deliberately no owner here: the owner of a new list is always
/// the authenticated caller and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFields {
    pub name: String,
    pub description: String,
}

/// Editable fields of an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFields {
    pub todo_list_id: TodoListId,
    pub name: String,
    pub description: String,
    pub status: ItemStatus,
}
