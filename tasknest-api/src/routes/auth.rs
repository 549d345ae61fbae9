/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /register` - Create a new user account
/// - `POST /login` - Verify credentials and establish a session
/// - `GET /logout` - Revoke the presented session
///
/// Login failures answer a single generic "invalid username or password"
/// regardless of which half was wrong.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{middleware::AuthContext, password, session},
    models::{
        session::Session,
        user::{CreateUser, User},
    },
};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Unique username
    #[validate(length(min = 1, max = 80, message = "Username must be 1-80 characters"))]
    pub username: String,

    /// Password (length-checked separately)
    pub password: String,

    /// Optional email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    /// Newly created user id
    pub user_id: i64,

    /// Echo of the registered username
    pub username: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username
    pub username: String,

    /// Password
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Authenticated user id
    pub user_id: i64,

    /// Session token; present it as `Authorization: Bearer <token>`
    pub token: String,
}

/// Logout response
#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    /// Whether a session was revoked
    pub logged_out: bool,
}

/// Register a new user
///
/// # Errors
///
/// - `409 Conflict`: username or email already taken
/// - `422 Unprocessable Entity`: validation failed
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<RegisterResponse>> {
    req.validate().map_err(ApiError::from_validation)?;
    password::validate_password(&req.password)
        .map_err(|msg| ApiError::validation("password", msg))?;

    // Check uniqueness up front so the caller gets a clear message rather
    // than a raw constraint violation.
    if User::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Conflict("Username already exists".to_string()));
    }
    if let Some(ref email) = req.email {
        if User::find_by_email(&state.db, email).await?.is_some() {
            return Err(ApiError::Conflict("Email already exists".to_string()));
        }
    }

    let password_hash = password::hash_password(&req.password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            username: req.username,
            email: req.email,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");

    Ok(Json(RegisterResponse {
        user_id: user.id,
        username: user.username,
    }))
}

/// Login and establish a session
///
/// # Errors
///
/// - `401 Unauthorized`: unknown username or wrong password (not
///   distinguished)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let user = User::find_by_username(&state.db, &req.username)
        .await?
        .ok_or_else(invalid)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(invalid());
    }

    User::update_last_login(&state.db, user.id).await?;

    let (token, token_hash) = session::generate_session_token();
    Session::create(&state.db, user.id, &token_hash, state.session_ttl_hours()).await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        user_id: user.id,
        token,
    }))
}

/// Logout: revoke the presented session
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<LogoutResponse>> {
    let logged_out = Session::revoke_by_id(&state.db, auth.session_id).await?;

    tracing::info!(user_id = auth.user_id, "User logged out");

    Ok(Json(LogoutResponse { logged_out }))
}
