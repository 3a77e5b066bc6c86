//! Multi-user todo lists web service.
//!
//! This crate provides the service as a library, allowing it to be tested
//! and reused by the CLI.
//!
//! # Layers
//!
//! - [`routes`] - axum handlers, one per endpoint
//! - [`services`] - ownership-checked access to lists and items
//! - [`db`] - store traits with `PostgreSQL` and in-memory implementations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
