/// Task model and database operations
///
/// Tasks are the core entity of TaskNest. A task belongs to exactly one
/// user, optionally points at one of that user's categories, carries zero
/// or more of their tags, and may hold a repeat policy and a reminder time.
/// Rows generated by the recurrence module reference their parent through
/// `parent_task_id`.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id               INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id          INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     category_id      INTEGER REFERENCES categories(id) ON DELETE SET NULL,
///     title            TEXT    NOT NULL,
///     description      TEXT,
///     complete         INTEGER NOT NULL DEFAULT 0,
///     priority         INTEGER NOT NULL DEFAULT 0,
///     due_date         TEXT,
///     repeat_type      TEXT    NOT NULL DEFAULT 'none',
///     repeat_interval  INTEGER NOT NULL DEFAULT 1,
///     reminder_at      TEXT,
///     last_notified_at TEXT,
///     parent_task_id   INTEGER REFERENCES tasks(id) ON DELETE SET NULL,
///     created_at       TEXT    NOT NULL
/// );
/// ```
///
/// # Ordering
///
/// Listings are ordered by due date ascending (SQLite places NULL due
/// dates first) with priority descending as the tie-break.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{SqliteExecutor, SqlitePool};

/// Priority level for low-priority tasks
pub const PRIORITY_LOW: i64 = 0;
/// Priority level for medium-priority tasks
pub const PRIORITY_MEDIUM: i64 = 1;
/// Priority level for high-priority tasks
pub const PRIORITY_HIGH: i64 = 2;

/// Repeat policy attached to a task
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum RepeatType {
    /// No recurrence
    #[default]
    None,

    /// Step of `repeat_interval` days
    Daily,

    /// Step of `repeat_interval` weeks
    Weekly,

    /// Step of `repeat_interval` calendar months
    Monthly,
}

impl RepeatType {
    /// Whether this policy produces follow-up tasks
    pub fn repeats(self) -> bool {
        self != RepeatType::None
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task id
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// Optional category reference (same-user)
    pub category_id: Option<i64>,

    /// Title (required, non-empty)
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Completion flag
    pub complete: bool,

    /// Priority: 0 = low, 1 = medium, 2 = high
    pub priority: i64,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Repeat policy
    pub repeat_type: RepeatType,

    /// Repeat interval count (>= 1)
    pub repeat_interval: i64,

    /// Optional reminder timestamp
    pub reminder_at: Option<DateTime<Utc>>,

    /// When the reminder was last emitted (None = never)
    ///
    /// Stamped by the reminder poller so a reminder fires at most once.
    pub last_notified_at: Option<DateTime<Utc>>,

    /// Parent task for recurrence-generated rows
    pub parent_task_id: Option<i64>,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Owning user
    pub user_id: i64,

    /// Optional category reference
    pub category_id: Option<i64>,

    /// Title (required)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority: 0 = low, 1 = medium, 2 = high
    pub priority: i64,

    /// Optional due date
    pub due_date: Option<DateTime<Utc>>,

    /// Repeat policy
    pub repeat_type: RepeatType,

    /// Repeat interval count
    pub repeat_interval: i64,

    /// Optional reminder timestamp
    pub reminder_at: Option<DateTime<Utc>>,

    /// Parent task id (set only by the recurrence generator)
    pub parent_task_id: Option<i64>,
}

/// Filters for task listings
///
/// All present filters are AND-combined.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    /// Case-insensitive substring match against the title
    pub search: Option<String>,

    /// Restrict to one category
    pub category_id: Option<i64>,

    /// Restrict to one priority value
    pub priority: Option<i64>,

    /// Restrict to tasks carrying one tag
    pub tag_id: Option<i64>,
}

const TASK_COLUMNS: &str = "id, user_id, category_id, title, description, complete, priority, \
     due_date, repeat_type, repeat_interval, reminder_at, last_notified_at, \
     parent_task_id, created_at";

impl Task {
    /// Creates a new task
    ///
    /// Accepts any executor so callers can run it inside a transaction
    /// together with tag attachment and follow-up generation.
    pub async fn create(
        executor: impl SqliteExecutor<'_>,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO tasks (user_id, category_id, title, description, priority,
                               due_date, repeat_type, repeat_interval, reminder_at,
                               parent_task_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(data.user_id)
            .bind(data.category_id)
            .bind(data.title)
            .bind(data.description)
            .bind(data.priority)
            .bind(data.due_date)
            .bind(data.repeat_type)
            .bind(data.repeat_interval)
            .bind(data.reminder_at)
            .bind(data.parent_task_id)
            .bind(Utc::now())
            .fetch_one(executor)
            .await
    }

    /// Finds a task by id, regardless of owner
    ///
    /// Handlers compare `user_id` themselves so they can answer 403 for a
    /// foreign task instead of folding it into 404.
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?");
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists a user's tasks with optional filters
    ///
    /// Filters are AND-combined; results are ordered by due date ascending
    /// then priority descending. SQLite's `LIKE` is case-insensitive for
    /// ASCII, which gives the substring search its intended behavior.
    pub async fn list_for_user(
        pool: &SqlitePool,
        user_id: i64,
        filter: &TaskFilter,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE user_id = ?");

        if filter.search.is_some() {
            sql.push_str(" AND title LIKE ?");
        }
        if filter.category_id.is_some() {
            sql.push_str(" AND category_id = ?");
        }
        if filter.priority.is_some() {
            sql.push_str(" AND priority = ?");
        }
        if filter.tag_id.is_some() {
            sql.push_str(" AND id IN (SELECT task_id FROM task_tags WHERE tag_id = ?)");
        }

        sql.push_str(" ORDER BY due_date ASC, priority DESC");

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(user_id);

        if let Some(ref search) = filter.search {
            query = query.bind(format!("%{}%", search));
        }
        if let Some(category_id) = filter.category_id {
            query = query.bind(category_id);
        }
        if let Some(priority) = filter.priority {
            query = query.bind(priority);
        }
        if let Some(tag_id) = filter.tag_id {
            query = query.bind(tag_id);
        }

        query.fetch_all(pool).await
    }

    /// Flips the completion flag of a task
    ///
    /// Returns the updated row, or None if the task does not exist.
    /// Toggling twice restores the original state.
    pub async fn toggle_complete(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "UPDATE tasks SET complete = NOT complete WHERE id = ? RETURNING {TASK_COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Deletes a task by id
    ///
    /// Returns true if a row was removed. Tag associations go with it via
    /// the `task_tags` cascade.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Attaches a set of tags to a task
    ///
    /// Tag ownership must already have been validated against the task's
    /// owner; this only writes the join rows. A single multi-row insert,
    /// so it runs on any executor, transactions included.
    pub async fn attach_tags(
        executor: impl SqliteExecutor<'_>,
        task_id: i64,
        tag_ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        if tag_ids.is_empty() {
            return Ok(());
        }

        let placeholders = vec!["(?, ?)"; tag_ids.len()].join(", ");
        let sql = format!(
            "INSERT OR IGNORE INTO task_tags (task_id, tag_id) VALUES {}",
            placeholders
        );

        let mut query = sqlx::query(&sql);
        for tag_id in tag_ids {
            query = query.bind(task_id).bind(tag_id);
        }
        query.execute(executor).await?;

        Ok(())
    }

    /// Returns the tag ids attached to a task
    pub async fn tag_ids(pool: &SqlitePool, task_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let rows: Vec<(i64,)> = sqlx::query_as(
            "SELECT tag_id FROM task_tags WHERE task_id = ? ORDER BY tag_id ASC",
        )
        .bind(task_id)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    /// Incomplete tasks with an un-notified reminder inside `(from, to]`
    ///
    /// Used by the reminder poller. Tasks whose reminder has already been
    /// emitted (`last_notified_at` set) are excluded so a reminder fires
    /// at most once even if its time stays inside two polling windows.
    pub async fn due_reminders(
        pool: &SqlitePool,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT {TASK_COLUMNS} FROM tasks
            WHERE complete = 0
              AND reminder_at IS NOT NULL
              AND reminder_at > ?
              AND reminder_at <= ?
              AND last_notified_at IS NULL
            ORDER BY reminder_at ASC
            "#
        );
        sqlx::query_as::<_, Task>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Stamps a task's reminder as emitted
    pub async fn mark_notified(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE tasks SET last_notified_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::pool::{create_pool, DatabaseConfig};
    use crate::models::tag::Tag;
    use crate::models::user::{CreateUser, User};
    use chrono::TimeZone;

    async fn test_pool() -> SqlitePool {
        let pool = create_pool(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout_seconds: 5,
        })
        .await
        .unwrap();
        run_migrations(&pool).await.unwrap();
        pool
    }

    async fn test_user(pool: &SqlitePool, username: &str) -> User {
        User::create(
            pool,
            CreateUser {
                username: username.to_string(),
                email: None,
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap()
    }

    fn simple_task(user_id: i64, title: &str) -> CreateTask {
        CreateTask {
            user_id,
            category_id: None,
            title: title.to_string(),
            description: None,
            priority: PRIORITY_LOW,
            due_date: None,
            repeat_type: RepeatType::None,
            repeat_interval: 1,
            reminder_at: None,
            parent_task_id: None,
        }
    }

    #[tokio::test]
    async fn test_create_defaults() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice").await;

        let task = Task::create(&pool, simple_task(alice.id, "Pay rent"))
            .await
            .unwrap();

        assert_eq!(task.title, "Pay rent");
        assert!(!task.complete);
        assert_eq!(task.priority, PRIORITY_LOW);
        assert_eq!(task.repeat_type, RepeatType::None);
        assert!(task.parent_task_id.is_none());
        assert!(task.last_notified_at.is_none());
    }

    #[tokio::test]
    async fn test_toggle_complete_is_involution() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice").await;
        let task = Task::create(&pool, simple_task(alice.id, "Laundry"))
            .await
            .unwrap();

        let toggled = Task::toggle_complete(&pool, task.id).await.unwrap().unwrap();
        assert!(toggled.complete);

        let toggled_back = Task::toggle_complete(&pool, task.id).await.unwrap().unwrap();
        assert!(!toggled_back.complete);

        assert!(Task::toggle_complete(&pool, 9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_ordering_due_date_then_priority() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice").await;

        let jan_1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let jan_2 = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();

        let mut later = simple_task(alice.id, "later");
        later.due_date = Some(jan_2);
        let mut early_low = simple_task(alice.id, "early-low");
        early_low.due_date = Some(jan_1);
        let mut early_high = simple_task(alice.id, "early-high");
        early_high.due_date = Some(jan_1);
        early_high.priority = PRIORITY_HIGH;
        let undated = simple_task(alice.id, "undated");

        Task::create(&pool, later).await.unwrap();
        Task::create(&pool, early_low).await.unwrap();
        Task::create(&pool, early_high).await.unwrap();
        Task::create(&pool, undated).await.unwrap();

        let tasks = Task::list_for_user(&pool, alice.id, &TaskFilter::default())
            .await
            .unwrap();
        let titles: Vec<&str> = tasks.iter().map(|t| t.title.as_str()).collect();

        // NULL due dates sort first under SQLite ASC, then due date, then
        // priority descending as the tie-break.
        assert_eq!(titles, vec!["undated", "early-high", "early-low", "later"]);
    }

    #[tokio::test]
    async fn test_filters_and_combine() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice").await;
        let bob = test_user(&pool, "bob").await;

        let urgent = Tag::create(&pool, alice.id, "urgent", "#f00").await.unwrap();

        let mut groceries = simple_task(alice.id, "Buy groceries");
        groceries.priority = PRIORITY_HIGH;
        let groceries = Task::create(&pool, groceries).await.unwrap();
        Task::attach_tags(&pool, groceries.id, &[urgent.id]).await.unwrap();

        Task::create(&pool, simple_task(alice.id, "Buy stamps")).await.unwrap();
        Task::create(&pool, simple_task(bob.id, "Buy nothing")).await.unwrap();

        // Case-insensitive search only sees the caller's rows.
        let found = Task::list_for_user(
            &pool,
            alice.id,
            &TaskFilter {
                search: Some("buy".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 2);

        // Search AND priority AND tag.
        let found = Task::list_for_user(
            &pool,
            alice.id,
            &TaskFilter {
                search: Some("buy".to_string()),
                priority: Some(PRIORITY_HIGH),
                tag_id: Some(urgent.id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, groceries.id);
    }

    #[tokio::test]
    async fn test_due_reminders_window_and_idempotence() {
        let pool = test_pool().await;
        let alice = test_user(&pool, "alice").await;

        let now = Utc::now();
        let in_window = now + chrono::Duration::minutes(10);
        let outside = now + chrono::Duration::hours(2);

        let mut soon = simple_task(alice.id, "soon");
        soon.reminder_at = Some(in_window);
        let soon = Task::create(&pool, soon).await.unwrap();

        let mut far = simple_task(alice.id, "far");
        far.reminder_at = Some(outside);
        Task::create(&pool, far).await.unwrap();

        let mut done = simple_task(alice.id, "done");
        done.reminder_at = Some(in_window);
        let done = Task::create(&pool, done).await.unwrap();
        Task::toggle_complete(&pool, done.id).await.unwrap();

        let window_end = now + chrono::Duration::minutes(30);
        let due = Task::due_reminders(&pool, now, window_end).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, soon.id);

        // After stamping, the same window yields nothing.
        assert!(Task::mark_notified(&pool, soon.id).await.unwrap());
        let due = Task::due_reminders(&pool, now, window_end).await.unwrap();
        assert!(due.is_empty());
    }
}
