//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};

use todo_app_core::{UserId, UserName};

/// An account known to the identity provider (domain type).
///
/// The password hash is never part of this type; it is only read back by the
/// login path through [`crate::db::UserStore::get_password_hash`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login name.
    pub user_name: UserName,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}
