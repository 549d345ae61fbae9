/// CSV export endpoint
///
/// `GET /export` streams the caller's full task list as a CSV attachment.
/// A user with no tasks still receives a valid file containing only the
/// header row.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue},
    Extension,
};
use tasknest_shared::{auth::middleware::AuthContext, export};

/// Exports the caller's tasks as a CSV download
pub async fn export_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> ApiResult<(HeaderMap, Vec<u8>)> {
    let csv = export::tasks_to_csv(&state.db, auth.user_id).await?;

    tracing::info!(user_id = auth.user_id, bytes = csv.len(), "Tasks exported");

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"tasks.csv\""),
    );

    Ok((headers, csv))
}
