/// User model and database operations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id            INTEGER PRIMARY KEY AUTOINCREMENT,
///     username      TEXT    NOT NULL UNIQUE,
///     email         TEXT    UNIQUE,
///     password_hash TEXT    NOT NULL,
///     created_at    TEXT    NOT NULL,
///     last_login_at TEXT
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use tasknest_shared::models::user::{CreateUser, User};
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let user = User::create(
///     &pool,
///     CreateUser {
///         username: "alice".to_string(),
///         email: Some("alice@example.com".to_string()),
///         password_hash: "$pbkdf2-sha256$...".to_string(),
///     },
/// )
/// .await?;
/// println!("Created user {}", user.id);
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// User account
///
/// Passwords are stored as pbkdf2-sha256 PHC strings, never in plaintext.
/// There is no delete path for users.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user id
    pub id: i64,

    /// Unique username
    pub username: String,

    /// Optional email address, unique when present
    pub email: Option<String>,

    /// pbkdf2-sha256 password hash (PHC string format)
    pub password_hash: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the user last logged in (None if never)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Unique username
    pub username: String,

    /// Optional email address
    pub email: Option<String>,

    /// Password hash (NOT the plaintext password)
    pub password_hash: String,
}

impl User {
    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a unique-violation database error if the username or email
    /// is already taken; callers should check with [`User::find_by_username`]
    /// first to surface a friendlier message.
    pub async fn create(pool: &SqlitePool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, email, password_hash, created_at, last_login_at
            "#,
        )
        .bind(data.username)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, last_login_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by username
    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, last_login_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by email address
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password_hash, created_at, last_login_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Updates the last login timestamp for a user
    ///
    /// Called after successful authentication. Returns true if the user
    /// existed and was updated.
    pub async fn update_last_login(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts total number of users
    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;
    use crate::db::pool::{create_pool, DatabaseConfig};

    async fn test_pool() -> SqlitePool {
        let pool = create_pool(DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connect_timeout_seconds: 5,
        })
        .await
        .expect("pool should be created");
        run_migrations(&pool).await.expect("migrations should apply");
        pool
    }

    #[tokio::test]
    async fn test_create_and_find_user() {
        let pool = test_pool().await;

        let user = User::create(
            &pool,
            CreateUser {
                username: "alice".to_string(),
                email: Some("alice@example.com".to_string()),
                password_hash: "hash".to_string(),
            },
        )
        .await
        .expect("create should succeed");

        assert_eq!(user.username, "alice");
        assert!(user.last_login_at.is_none());

        let by_name = User::find_by_username(&pool, "alice")
            .await
            .expect("query should succeed")
            .expect("user should exist");
        assert_eq!(by_name.id, user.id);

        let by_email = User::find_by_email(&pool, "alice@example.com")
            .await
            .expect("query should succeed")
            .expect("user should exist");
        assert_eq!(by_email.id, user.id);

        assert!(User::find_by_username(&pool, "bob")
            .await
            .expect("query should succeed")
            .is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let pool = test_pool().await;

        let create = CreateUser {
            username: "alice".to_string(),
            email: None,
            password_hash: "hash".to_string(),
        };

        User::create(&pool, create.clone())
            .await
            .expect("first create should succeed");

        let err = User::create(&pool, create).await;
        assert!(err.is_err(), "duplicate username must be rejected");
        assert_eq!(User::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_last_login() {
        let pool = test_pool().await;

        let user = User::create(
            &pool,
            CreateUser {
                username: "alice".to_string(),
                email: None,
                password_hash: "hash".to_string(),
            },
        )
        .await
        .unwrap();

        assert!(User::update_last_login(&pool, user.id).await.unwrap());

        let reloaded = User::find_by_id(&pool, user.id).await.unwrap().unwrap();
        assert!(reloaded.last_login_at.is_some());

        assert!(!User::update_last_login(&pool, 9999).await.unwrap());
    }
}
