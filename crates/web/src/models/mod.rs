//! Domain models for the web service.

pub mod forms;
pub mod session;
pub mod todo;
pub mod user;

pub use forms::{ItemForm, ListForm, StatusForm, ValidationErrors};
pub use session::{CurrentUser, SessionInfo, keys as session_keys};
pub use todo::{ItemFields, ListFields, TodoItem, TodoList};
pub use user::User;
