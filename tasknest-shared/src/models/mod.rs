/// Database models for TaskNest
///
/// This module contains all database models and their CRUD operations.
///
/// # Models
///
/// - `user`: User accounts
/// - `session`: Server-side login sessions
/// - `category`: Per-user task categories
/// - `tag`: Per-user tags with display colors
/// - `task`: Tasks, including filters, recurrence fields, and reminders
///
/// # Ownership
///
/// Every category, tag, and task row belongs to exactly one user. Queries
/// that act on behalf of a caller are scoped to that user's rows; handlers
/// that need to distinguish "not found" from "owned by someone else" fetch
/// by id first and compare owners explicitly.

pub mod category;
pub mod session;
pub mod tag;
pub mod task;
pub mod user;
