/// Tag model and database operations
///
/// Tags are per-user labels with a display color, attached to tasks via
/// the `task_tags` join table. Tag creation is the only mutation; there is
/// no update or delete path.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Default tag color when the caller supplies none
pub const DEFAULT_TAG_COLOR: &str = "#808080";

/// Tag owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag id
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Display name
    pub name: String,

    /// Display color (hex string, e.g. "#ff8800")
    pub color: String,
}

impl Tag {
    /// Creates a tag for a user
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        name: &str,
        color: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (user_id, name, color)
            VALUES (?, ?, ?)
            RETURNING id, user_id, name, color
            "#,
        )
        .bind(user_id)
        .bind(name)
        .bind(color)
        .fetch_one(pool)
        .await
    }

    /// Lists all tags owned by a user, by name
    pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            "SELECT id, user_id, name, color FROM tags WHERE user_id = ? ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Counts how many of the given tag ids are owned by the user
    ///
    /// Used to validate tag references on task creation: a count smaller
    /// than the number of distinct ids means at least one tag is missing
    /// or belongs to someone else.
    pub async fn count_owned(
        pool: &SqlitePool,
        user_id: i64,
        tag_ids: &[i64],
    ) -> Result<i64, sqlx::Error> {
        if tag_ids.is_empty() {
            return Ok(0);
        }

        let placeholders = vec!["?"; tag_ids.len()].join(", ");
        let sql = format!(
            "SELECT COUNT(*) FROM tags WHERE user_id = ? AND id IN ({})",
            placeholders
        );

        let mut query = sqlx::query_as::<_, (i64,)>(&sql).bind(user_id);
        for id in tag_ids {
            query = query.bind(id);
        }

        let (count,) = query.fetch_one(pool).await?;
        Ok(count)
    }

    /// Lists the tags attached to a task, by name
    pub async fn list_for_task(pool: &SqlitePool, task_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.user_id, t.name, t.color
            FROM tags t
            JOIN task_tags tt ON tt.tag_id = t.id
            WHERE tt.task_id = ?
            ORDER BY t.name ASC
            "#,
        )
        .bind(task_id)
        .fetch_all(pool)
        .await
    }
}
