/// CSV export of a user's tasks
///
/// Flattens every task owned by a user into one row with human-readable
/// priority, status, category name, and a semicolon-joined tag list, and
/// serializes the lot as CSV. A user with no tasks yields the header row
/// only. Read-only; nothing is persisted.

use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::debug;

use crate::models::category::Category;
use crate::models::tag::Tag;
use crate::models::task::{Task, TaskFilter, PRIORITY_HIGH, PRIORITY_MEDIUM};

/// Column headers of the export file
pub const EXPORT_HEADERS: [&str; 9] = [
    "ID",
    "Title",
    "Description",
    "Status",
    "Priority",
    "Category",
    "Tags",
    "Due Date",
    "Created At",
];

/// Error type for export operations
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Database failure while loading tasks
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// CSV serialization failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Human-readable priority label
pub fn priority_label(priority: i64) -> &'static str {
    match priority {
        PRIORITY_HIGH => "High",
        PRIORITY_MEDIUM => "Medium",
        _ => "Low",
    }
}

/// Serializes all of a user's tasks to CSV bytes
///
/// Rows follow the listing order (due date ascending, then priority
/// descending).
pub async fn tasks_to_csv(pool: &SqlitePool, user_id: i64) -> Result<Vec<u8>, ExportError> {
    let tasks = Task::list_for_user(pool, user_id, &TaskFilter::default()).await?;

    let categories: HashMap<i64, String> = Category::list_for_user(pool, user_id)
        .await?
        .into_iter()
        .map(|c| (c.id, c.name))
        .collect();

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;

    for task in &tasks {
        let tags = Tag::list_for_task(pool, task.id).await?;
        let tag_list = tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join("; ");

        let category = task
            .category_id
            .and_then(|id| categories.get(&id))
            .map(String::as_str)
            .unwrap_or("");

        writer.write_record([
            task.id.to_string().as_str(),
            task.title.as_str(),
            task.description.as_deref().unwrap_or(""),
            if task.complete { "Done" } else { "Open" },
            priority_label(task.priority),
            category,
            tag_list.as_str(),
            task.due_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
                .as_str(),
            task.created_at.format("%Y-%m-%d %H:%M").to_string().as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))?;

    debug!(user_id, rows = tasks.len(), "Exported tasks to CSV");
    Ok(bytes)
}
