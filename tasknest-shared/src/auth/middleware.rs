/// Authentication middleware support for Axum
///
/// The API layer wraps protected routes in a middleware that calls
/// [`authenticate`] with the `Authorization` header, then inserts the
/// resulting [`AuthContext`] into request extensions for handlers to pull
/// out with Axum's `Extension` extractor.
///
/// # Example
///
/// ```
/// use axum::Extension;
/// use tasknest_shared::auth::middleware::AuthContext;
///
/// async fn handler(Extension(auth): Extension<AuthContext>) -> String {
///     format!("User: {}", auth.user_id)
/// }
/// ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use super::session::{hash_session_token, validate_token_format};
use crate::models::session::Session;

/// Authentication context added to request extensions
///
/// Present on every request that passed the session middleware.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AuthContext {
    /// Authenticated user id
    pub user_id: i64,

    /// Session row backing this login
    pub session_id: i64,
}

/// Error type for the authentication middleware
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Missing authorization header
    #[error("Missing credentials")]
    MissingCredentials,

    /// Invalid authorization header format
    #[error("Invalid authorization header: {0}")]
    InvalidFormat(String),

    /// Token unknown, expired, or malformed
    #[error("Invalid session token")]
    InvalidToken,

    /// Database error during session lookup
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Missing credentials").into_response()
            }
            AuthError::InvalidFormat(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            AuthError::InvalidToken => {
                (StatusCode::UNAUTHORIZED, "Invalid session token").into_response()
            }
            AuthError::DatabaseError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}

/// Authenticates a request from its `Authorization` header value
///
/// Expects `Bearer tn_...`; looks the token's hash up in the sessions
/// table and rejects expired or unknown sessions.
///
/// # Errors
///
/// - [`AuthError::MissingCredentials`] when no header is present
/// - [`AuthError::InvalidFormat`] when the header is not a Bearer token
/// - [`AuthError::InvalidToken`] when the session is unknown or expired
pub async fn authenticate(
    pool: &SqlitePool,
    auth_header: Option<&str>,
) -> Result<AuthContext, AuthError> {
    let header = auth_header.ok_or(AuthError::MissingCredentials)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AuthError::InvalidFormat("Expected Bearer token".to_string()))?;

    if !validate_token_format(token) {
        return Err(AuthError::InvalidToken);
    }

    let token_hash = hash_session_token(token);
    let session = Session::find_live_by_token_hash(pool, &token_hash)
        .await
        .map_err(|e| AuthError::DatabaseError(e.to_string()))?
        .ok_or(AuthError::InvalidToken)?;

    Ok(AuthContext {
        user_id: session.user_id,
        session_id: session.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::generate_session_token;
    use crate::db::migrations::run_migrations;
    use crate::db::pool::{create_pool, DatabaseConfig};
    use crate::models::session::DEFAULT_SESSION_TTL_HOURS;
    use crate::models::user::{CreateUser, User};

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

    #[tokio::test]
    async fn test_authenticate_happy_path() {
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

        let (token, token_hash) = generate_session_token();
        Session::create(&pool, user.id, &token_hash, DEFAULT_SESSION_TTL_HOURS)
            .await
            .unwrap();

        let header = format!("Bearer {}", token);
        let ctx = authenticate(&pool, Some(&header)).await.unwrap();
        assert_eq!(ctx.user_id, user.id);
    }

    #[tokio::test]
    async fn test_authenticate_rejects_bad_headers() {
        let pool = test_pool().await;

        assert!(matches!(
            authenticate(&pool, None).await,
            Err(AuthError::MissingCredentials)
        ));
        assert!(matches!(
            authenticate(&pool, Some("Basic abc")).await,
            Err(AuthError::InvalidFormat(_))
        ));
        assert!(matches!(
            authenticate(&pool, Some("Bearer garbage")).await,
            Err(AuthError::InvalidToken)
        ));

        // Well-formed but unknown token.
        let (token, _) = generate_session_token();
        let header = format!("Bearer {}", token);
        assert!(matches!(
            authenticate(&pool, Some(&header)).await,
            Err(AuthError::InvalidToken)
        ));
    }
}
