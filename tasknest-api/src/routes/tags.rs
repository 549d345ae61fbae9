/// Tag endpoints
///
/// Tags are per-user labels with a display color. A task can carry any
/// number of the caller's tags.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use tasknest_shared::{
    auth::middleware::AuthContext,
    models::tag::{Tag, DEFAULT_TAG_COLOR},
};
use validator::Validate;

/// Create tag request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// Tag name (required, non-empty)
    #[validate(length(min = 1, max = 80, message = "Tag name is required"))]
    pub name: String,

    /// Display color as a hex string; defaults to gray
    pub color: Option<String>,
}

/// Lists the caller's tags, ordered by name
pub async fn list_tags(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Tag>>> {
    let tags = Tag::list_for_user(&state.db, auth.user_id).await?;
    Ok(Json(tags))
}

/// Creates a tag for the caller
pub async fn create_tag(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<Json<Tag>> {
    req.validate().map_err(ApiError::from_validation)?;

    let color = req.color.as_deref().unwrap_or(DEFAULT_TAG_COLOR);
    let tag = Tag::create(&state.db, auth.user_id, req.name.trim(), color).await?;

    tracing::info!(tag_id = tag.id, user_id = auth.user_id, "Tag created");

    Ok(Json(tag))
}
