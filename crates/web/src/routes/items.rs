//! Todo item route handlers.
//!
//! Every handler resolves ownership through the parent list; a `todoListId`
//! in the body is only a target, never a credential.

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use todo_app_core::{TodoItemId, TodoListId};

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{ItemForm, StatusForm, TodoItem, TodoList};
use crate::state::AppState;

/// `?listId=` query parameter.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub list_id: Option<i32>,
}

impl ListQuery {
    // Missing is treated like any other non-positive id.
    fn list_id(&self) -> TodoListId {
        TodoListId::new(self.list_id.unwrap_or(0))
    }
}

/// A list together with its items.
#[derive(Debug, Serialize)]
pub struct ListItems {
    pub list: TodoList,
    pub items: Vec<TodoItem>,
}

/// Items of one list owned by the caller.
pub async fn index(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListItems>> {
    let (list, items) = state
        .items()
        .items_for_list(&auth.user_id(), query.list_id())
        .await?;
    Ok(Json(ListItems { list, items }))
}

/// A single item.
pub async fn show(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
) -> Result<Json<TodoItem>> {
    let item = state
        .items()
        .item_for_user(&auth.user_id(), TodoItemId::new(id))
        .await?;
    Ok(Json(item))
}

/// Blank create form bound to a list the caller owns.
pub async fn new_form(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Query(query): Query<ListQuery>,
) -> Result<Json<ItemForm>> {
    let list = state
        .lists()
        .list_for_user(&auth.user_id(), query.list_id())
        .await?;
    Ok(Json(ItemForm::blank(list.id)))
}

/// Create an item in a list the caller owns.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ItemForm>,
) -> Result<(StatusCode, Json<TodoItem>)> {
    let fields = form
        .validate()
        .map_err(|errors| AppError::validation(errors, &form))?;

    let item = state.items().create_item(&user.id, fields).await?;
    tracing::info!(item_id = %item.id, list_id = %item.todo_list_id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// The item as a pre-filled edit form.
pub async fn edit_form(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
) -> Result<Json<ItemForm>> {
    let item = state
        .items()
        .item_for_user(&auth.user_id(), TodoItemId::new(id))
        .await?;
    Ok(Json(ItemForm::from_item(&item)))
}

/// Update every field, possibly moving the item to another owned list.
pub async fn update(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
    Form(form): Form<ItemForm>,
) -> Result<Json<TodoItem>> {
    let fields = form
        .validate()
        .map_err(|errors| AppError::validation(errors, &form))?;

    let item = state
        .items()
        .update_item(&auth.user_id(), TodoItemId::new(id), fields, form.version)
        .await?;
    Ok(Json(item))
}

/// Change only the status.
pub async fn update_status(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
    Form(form): Form<StatusForm>,
) -> Result<Json<TodoItem>> {
    let status = form
        .validate()
        .map_err(|errors| AppError::validation(errors, &form))?;

    let item = state
        .items()
        .update_item_status(&auth.user_id(), TodoItemId::new(id), status, form.version)
        .await?;
    Ok(Json(item))
}

/// The item to confirm deletion of.
pub async fn delete_confirm(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
) -> Result<Json<TodoItem>> {
    let item = state
        .items()
        .item_for_user(&auth.user_id(), TodoItemId::new(id))
        .await?;
    Ok(Json(item))
}

/// Delete the item.
pub async fn delete(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let item = state
        .items()
        .delete_item(&auth.user_id(), TodoItemId::new(id))
        .await?;
    tracing::info!(item_id = %item.id, list_id = %item.todo_list_id, "item deleted");
    Ok(StatusCode::NO_CONTENT)
}
