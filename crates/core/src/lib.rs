//! Todo App Core - Shared types library.
//!
//! This crate provides common types used across all components:
//! - `web` - HTTP service for todo lists and items
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, user identity, and item status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
