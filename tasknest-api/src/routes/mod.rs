/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login, and logout
/// - `tasks`: Task listing, creation, completion toggle, and deletion
/// - `categories`: Category creation
/// - `tags`: Tag creation
/// - `export`: CSV download of the caller's tasks

pub mod auth;
pub mod categories;
pub mod export;
pub mod health;
pub mod tags;
pub mod tasks;
