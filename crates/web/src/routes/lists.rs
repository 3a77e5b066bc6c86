//! Todo list route handlers.

use axum::{
    Form, Json,
    extract::{Path, State},
    http::StatusCode,
};

use todo_app_core::TodoListId;

use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::{ListForm, TodoList};
use crate::state::AppState;

/// Lists owned by the caller. Anonymous callers get an empty array.
pub async fn index(State(state): State<AppState>, auth: OptionalAuth) -> Result<Json<Vec<TodoList>>> {
    let lists = state.lists().list_all_for_user(&auth.user_id()).await?;
    Ok(Json(lists))
}

/// A single list.
pub async fn show(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
) -> Result<Json<TodoList>> {
    let list = state
        .lists()
        .list_for_user(&auth.user_id(), TodoListId::new(id))
        .await?;
    Ok(Json(list))
}

/// Blank create form.
pub async fn new_form(RequireAuth(_user): RequireAuth) -> Json<ListForm> {
    Json(ListForm::default())
}

/// Create a list owned by the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Form(form): Form<ListForm>,
) -> Result<(StatusCode, Json<TodoList>)> {
    let fields = form
        .validate()
        .map_err(|errors| AppError::validation(errors, &form))?;

    let list = state.lists().create_list(&user.id, fields).await?;
    tracing::info!(list_id = %list.id, user_id = %user.id, "list created");
    Ok((StatusCode::CREATED, Json(list)))
}

/// The list as a pre-filled edit form.
pub async fn edit_form(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
) -> Result<Json<ListForm>> {
    let list = state
        .lists()
        .list_for_user(&auth.user_id(), TodoListId::new(id))
        .await?;
    Ok(Json(ListForm::from_list(&list)))
}

/// Update name and description.
pub async fn update(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
    Form(form): Form<ListForm>,
) -> Result<Json<TodoList>> {
    let fields = form
        .validate()
        .map_err(|errors| AppError::validation(errors, &form))?;

    let list = state
        .lists()
        .update_list(&auth.user_id(), TodoListId::new(id), fields, form.version)
        .await?;
    Ok(Json(list))
}

/// The list to confirm deletion of.
pub async fn delete_confirm(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
) -> Result<Json<TodoList>> {
    let list = state
        .lists()
        .list_for_user(&auth.user_id(), TodoListId::new(id))
        .await?;
    Ok(Json(list))
}

/// Delete the list and every item in it.
pub async fn delete(
    State(state): State<AppState>,
    auth: OptionalAuth,
    Path(id): Path<i32>,
) -> Result<StatusCode> {
    let list = state
        .lists()
        .delete_list(&auth.user_id(), TodoListId::new(id))
        .await?;
    tracing::info!(list_id = %list.id, "list deleted");
    Ok(StatusCode::NO_CONTENT)
}
