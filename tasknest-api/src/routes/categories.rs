/// Category endpoints
///
/// Categories are a flat per-user namespace used to group tasks. A task
/// references at most one category.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use tasknest_shared::{auth::middleware::AuthContext, models::category::Category};
use validator::Validate;

/// Create category request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    /// Category name (required, non-empty)
    #[validate(length(min = 1, max = 80, message = "Category name is required"))]
    pub name: String,
}

/// Lists the caller's categories, ordered by name
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = Category::list_for_user(&state.db, auth.user_id).await?;
    Ok(Json(categories))
}

/// Creates a category for the caller
pub async fn create_category(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateCategoryRequest>,
) -> ApiResult<Json<Category>> {
    req.validate().map_err(ApiError::from_validation)?;

    let category = Category::create(&state.db, auth.user_id, req.name.trim()).await?;

    tracing::info!(
        category_id = category.id,
        user_id = auth.user_id,
        "Category created"
    );

    Ok(Json(category))
}
