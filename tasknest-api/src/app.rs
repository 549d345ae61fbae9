/// Application state and router builder
///
/// This module defines the shared application state and builds the Axum
/// router with all routes and middleware.
///
/// # Route Map
///
/// ```text
/// /
/// ├── GET  /health            # Health check (public)
/// ├── POST /register          # Create account (public)
/// ├── POST /login             # Establish session (public)
/// ├── GET  /logout            # Revoke session
/// ├── GET  /                  # List/filter tasks
/// ├── POST /add               # Create task (+ recurrence follow-ups)
/// ├── GET  /categories        # List categories
/// ├── POST /add_category      # Create category
/// ├── GET  /tags              # List tags
/// ├── POST /add_tag           # Create tag
/// ├── GET  /complete/:id      # Toggle completion
/// ├── GET  /delete/:id        # Delete task
/// └── GET  /export            # CSV download
/// ```
///
/// Everything below `/logout` requires a `Bearer tn_...` session token;
/// the middleware resolves it to a [`middleware::AuthContext`] in request
/// extensions.

use crate::config::Config;
use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tasknest_shared::auth::middleware;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: SqlitePool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Session lifetime for newly issued logins
    pub fn session_ttl_hours(&self) -> i64 {
        self.config.session.ttl_hours
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Example
///
/// ```no_run
/// use tasknest_api::app::{build_router, AppState};
/// use tasknest_api::config::Config;
/// use tasknest_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// let app = build_router(AppState::new(pool, config));
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Public routes, no session required.
    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything else requires a live session.
    let protected_routes = Router::new()
        .route("/", get(routes::tasks::list_tasks))
        .route("/add", post(routes::tasks::create_task))
        .route("/complete/:id", get(routes::tasks::toggle_complete))
        .route("/delete/:id", get(routes::tasks::delete_task))
        .route("/categories", get(routes::categories::list_categories))
        .route("/add_category", post(routes::categories::create_category))
        .route("/tags", get(routes::tags::list_tags))
        .route("/add_tag", post(routes::tags::create_tag))
        .route("/export", get(routes::export::export_tasks))
        .route("/logout", get(routes::auth::logout))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_auth_layer,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Extracts the bearer token from the Authorization header, resolves it
/// to a live session, and injects [`middleware::AuthContext`] into
/// request extensions.
async fn session_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let auth_context = middleware::authenticate(&state.db, auth_header).await?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
