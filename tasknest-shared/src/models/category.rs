/// Category model and database operations
///
/// Categories are simple per-user labels a task can optionally point at.
/// There is no update or delete path; `tasks.category_id` is SET NULL on
/// category deletion should one ever be added.

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Task category owned by a single user
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    /// Unique category id
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Display name
    pub name: String,
}

impl Category {
    /// Creates a category for a user
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        name: &str,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (user_id, name)
            VALUES (?, ?)
            RETURNING id, user_id, name
            "#,
        )
        .bind(user_id)
        .bind(name)
        .fetch_one(pool)
        .await
    }

    /// Finds a category by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, user_id, name FROM categories WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists all categories owned by a user, by name
    pub async fn list_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            "SELECT id, user_id, name FROM categories WHERE user_id = ? ORDER BY name ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
