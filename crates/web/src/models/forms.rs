//! Form payloads bound from request bodies, and their validation.
//!
//! Forms keep exactly what the client sent so a failed submission can be
//! echoed back unchanged. `validate` turns a form into the domain fields the
//! access services accept.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

use todo_app_core::{ItemStatus, TodoListId};

use super::todo::{ItemFields, ListFields, TodoItem, TodoList};

/// Maximum length of a list or item name.
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length of a list or item description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// Field-level validation failures, keyed by the form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    /// Record an error for `field`. The first error per field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    /// Whether no errors were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The error recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    fn finish<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Browsers submit untouched numeric inputs as empty strings.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Trim `value` and check it is present and within `max` characters.
fn required_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max: usize,
) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, format!("{field} is required"));
    } else if trimmed.chars().count() > max {
        errors.add(field, format!("{field} must be at most {max} characters"));
    }
    trimmed.to_owned()
}

// =============================================================================
// Lists
// =============================================================================

/// Create/edit form for a list.
///
/// Any `userId` in the submitted body is not bound: ownership is never taken
/// from the client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Version the client loaded; absent means "whatever is current".
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<i32>,
}

impl ListForm {
    /// Pre-filled edit form for an existing list.
    #[must_use]
    pub fn from_list(list: &TodoList) -> Self {
        Self {
            name: list.name.clone(),
            description: list.description.clone(),
            version: Some(list.version),
        }
    }

    /// Validate into list fields.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors if any field is invalid.
    pub fn validate(&self) -> Result<ListFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = required_text(&mut errors, "name", &self.name, MAX_NAME_LENGTH);
        let description = required_text(
            &mut errors,
            "description",
            &self.description,
            MAX_DESCRIPTION_LENGTH,
        );
        errors.finish(ListFields { name, description })
    }
}

// =============================================================================
// Items
// =============================================================================

/// Create/edit form for an item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub todo_list_id: Option<i32>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<i32>,
}

impl ItemForm {
    /// Blank create form bound to a list.
    #[must_use]
    pub fn blank(list_id: TodoListId) -> Self {
        Self {
            status: Some(ItemStatus::NEW.to_owned()),
            todo_list_id: Some(list_id.as_i32()),
            ..Self::default()
        }
    }

    /// Pre-filled edit form for an existing item.
    #[must_use]
    pub fn from_item(item: &TodoItem) -> Self {
        Self {
            name: item.name.clone(),
            description: item.description.clone(),
            status: Some(item.status.to_string()),
            todo_list_id: Some(item.todo_list_id.as_i32()),
            version: Some(item.version),
        }
    }

    /// Validate into item fields. A blank status becomes `"new"`.
    ///
    /// # Errors
    ///
    /// Returns the collected field errors if any field is invalid.
    pub fn validate(&self) -> Result<ItemFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = required_text(&mut errors, "name", &self.name, MAX_NAME_LENGTH);
        let description = required_text(
            &mut errors,
            "description",
            &self.description,
            MAX_DESCRIPTION_LENGTH,
        );
        let status = ItemStatus::parse_or_default(self.status.as_deref()).unwrap_or_else(|e| {
            errors.add("status", e.to_string());
            ItemStatus::default()
        });
        let todo_list_id = match self.todo_list_id {
            Some(id) if id > 0 => TodoListId::new(id),
            Some(_) => {
                errors.add("todoListId", "todoListId must be a positive list id");
                TodoListId::new(0)
            }
            None => {
                errors.add("todoListId", "todoListId is required");
                TodoListId::new(0)
            }
        };
        errors.finish(ItemFields {
            todo_list_id,
            name,
            description,
            status,
        })
    }
}

/// Status-only update form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusForm {
    #[serde(default)]
    pub status: String,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub version: Option<i32>,
}

impl StatusForm {
    /// Validate the new status. Unlike item creation, a blank status is an error.
    ///
    /// # Errors
    ///
    /// Returns a `status` field error if the value is blank or too long.
    pub fn validate(&self) -> Result<ItemStatus, ValidationErrors> {
        ItemStatus::parse(&self.status).map_err(|e| {
            let mut errors = ValidationErrors::default();
            errors.add("status", e.to_string());
            errors
        })
    }
}
