/// Server-side login sessions
///
/// A session row is created at login and deleted at logout. Only the
/// SHA-256 hash of the session token is stored; the plaintext token exists
/// solely in the client's hands. Token generation and hashing live in
/// [`crate::auth::session`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE sessions (
///     id         INTEGER PRIMARY KEY AUTOINCREMENT,
///     user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     token_hash TEXT    NOT NULL UNIQUE,
///     created_at TEXT    NOT NULL,
///     expires_at TEXT    NOT NULL
/// );
/// ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Default session lifetime in hours (30 days)
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 30;

/// Login session
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Session {
    /// Unique session id
    pub id: i64,

    /// Owning user
    pub user_id: i64,

    /// SHA-256 hex digest of the session token
    pub token_hash: String,

    /// When the session was established
    pub created_at: DateTime<Utc>,

    /// When the session stops being accepted
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session for a user
    ///
    /// # Arguments
    ///
    /// * `token_hash` - SHA-256 hex digest of the plaintext token
    /// * `ttl_hours` - Session lifetime in hours
    pub async fn create(
        pool: &SqlitePool,
        user_id: i64,
        token_hash: &str,
        ttl_hours: i64,
    ) -> Result<Self, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (user_id, token_hash, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, user_id, token_hash, created_at, expires_at
            "#,
        )
        .bind(user_id)
        .bind(token_hash)
        .bind(now)
        .bind(now + Duration::hours(ttl_hours))
        .fetch_one(pool)
        .await
    }

    /// Finds a live session by token hash
    ///
    /// Expired sessions are treated as absent.
    pub async fn find_live_by_token_hash(
        pool: &SqlitePool,
        token_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Session>(
            r#"
            SELECT id, user_id, token_hash, created_at, expires_at
            FROM sessions
            WHERE token_hash = ? AND expires_at > ?
            "#,
        )
        .bind(token_hash)
        .bind(Utc::now())
        .fetch_optional(pool)
        .await
    }

    /// Revokes a session by id
    ///
    /// Used by logout, where the middleware has already resolved the
    /// presented token to a session row. Returns true if a row was
    /// deleted.
    pub async fn revoke_by_id(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Deletes all expired sessions
    ///
    /// Housekeeping; returns the number of rows removed.
    pub async fn purge_expired(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
