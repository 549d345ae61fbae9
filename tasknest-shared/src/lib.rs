//! # TaskNest Shared Library
//!
//! This crate contains the types, database layer, and business logic shared
//! between the TaskNest API server and the reminder worker.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, sessions, categories, tags, tasks)
//! - `auth`: Password hashing, session tokens, and auth middleware
//! - `db`: SQLite connection pool and migrations
//! - `recurrence`: Follow-up generation for repeating tasks
//! - `export`: CSV export of a user's tasks

pub mod auth;
pub mod db;
pub mod export;
pub mod models;
pub mod recurrence;

/// Current version of the TaskNest shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
