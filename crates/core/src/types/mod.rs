//! Core types for the todo application.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod status;
pub mod user;

pub use id::*;
pub use status::{ItemStatus, ItemStatusError};
pub use user::{UserId, UserName, UserNameError};
