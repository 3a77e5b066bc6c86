//! Business logic services.
//!
//! # Services
//!
//! - `lists` - Ownership-checked list operations
//! - `items` - Ownership-checked item operations (owner derived from the parent list)
//! - `auth` - Password identity provider (registration, login)
//!
//! Every operation takes the caller's [`todo_app_core::UserId`] explicitly.
//! A row that is missing and a row owned by someone else both surface as
//! [`AccessError::NotFound`], so callers cannot probe for other users' data.

pub mod auth;
pub mod items;
pub mod lists;

use thiserror::Error;

use crate::db::RepositoryError;

pub use auth::{AuthError, AuthService};
pub use items::ItemAccessService;
pub use lists::ListAccessService;

/// Errors returned by the access services.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The row does not exist or is not owned by the caller.
    #[error("not found")]
    NotFound,

    /// The row changed since the caller loaded it.
    #[error("the record was modified by someone else; reload and try again")]
    Conflict,

    /// Repository/database error.
    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for AccessError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound,
            other => Self::Repository(other),
        }
    }
}
