/// Task endpoints
///
/// # Endpoints
///
/// - `GET /` - List the caller's tasks with optional filters
/// - `POST /add` - Create a task (and recurrence follow-ups)
/// - `GET /complete/:id` - Toggle a task's completion flag
/// - `GET /delete/:id` - Delete a task
///
/// # Authorization
///
/// Every operation is scoped to the session user. Acting on a task that
/// exists but belongs to someone else answers `403 Forbidden`; an unknown
/// id answers `404 Not Found`. Tag and category references supplied on
/// creation are validated against the caller's own rows.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::middleware::AuthContext,
    models::{
        category::Category,
        tag::Tag,
        task::{CreateTask, RepeatType, Task, TaskFilter},
    },
    recurrence,
};
use validator::Validate;

/// Query parameters for task listing
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match against the title
    pub search: Option<String>,

    /// Restrict to one category id
    pub category: Option<i64>,

    /// Restrict to one priority value
    pub priority: Option<i64>,

    /// Restrict to tasks carrying one tag id
    pub tag: Option<i64>,
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Title (required, non-empty)
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional category id (must be owned by the caller)
    pub category_id: Option<i64>,

    /// Priority: 0 = low, 1 = medium, 2 = high
    #[serde(default)]
    #[validate(range(min = 0, max = 2, message = "Priority must be 0, 1, or 2"))]
    pub priority: i64,

    /// Due date as "YYYY-MM-DD"
    pub due_date: Option<String>,

    /// Repeat policy (defaults to none)
    #[serde(default)]
    pub repeat_type: RepeatType,

    /// Repeat interval count
    #[serde(default = "default_repeat_interval")]
    #[validate(range(min = 1, message = "Repeat interval must be at least 1"))]
    pub repeat_interval: i64,

    /// Reminder time as "YYYY-MM-DDTHH:MM"
    pub reminder_time: Option<String>,

    /// Tag ids to attach (all must be owned by the caller)
    #[serde(default)]
    pub tag_ids: Vec<i64>,
}

fn default_repeat_interval() -> i64 {
    1
}

/// Task as returned by the API, tags included
#[derive(Debug, Serialize)]
pub struct TaskResponse {
    /// Task id
    pub id: i64,

    /// Title
    pub title: String,

    /// Description
    pub description: Option<String>,

    /// Completion flag
    pub complete: bool,

    /// Priority: 0 = low, 1 = medium, 2 = high
    pub priority: i64,

    /// Due date
    pub due_date: Option<DateTime<Utc>>,

    /// Category reference
    pub category_id: Option<i64>,

    /// Repeat policy
    pub repeat_type: RepeatType,

    /// Repeat interval count
    pub repeat_interval: i64,

    /// Reminder time
    pub reminder_at: Option<DateTime<Utc>>,

    /// Parent task for recurrence-generated rows
    pub parent_task_id: Option<i64>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Attached tags
    pub tags: Vec<Tag>,
}

impl TaskResponse {
    async fn from_task(state: &AppState, task: Task) -> ApiResult<Self> {
        let tags = Tag::list_for_task(&state.db, task.id).await?;
        Ok(Self {
            id: task.id,
            title: task.title,
            description: task.description,
            complete: task.complete,
            priority: task.priority,
            due_date: task.due_date,
            category_id: task.category_id,
            repeat_type: task.repeat_type,
            repeat_interval: task.repeat_interval,
            reminder_at: task.reminder_at,
            parent_task_id: task.parent_task_id,
            created_at: task.created_at,
            tags,
        })
    }
}

/// Create task response
#[derive(Debug, Serialize)]
pub struct CreateTaskResponse {
    /// The created task
    pub task: TaskResponse,

    /// Ids of recurrence follow-ups, in due-date order (empty when the
    /// task does not repeat)
    pub follow_up_ids: Vec<i64>,
}

/// Lists the caller's tasks
///
/// All query filters are AND-combined; results are ordered by due date
/// ascending then priority descending.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<TaskResponse>>> {
    let filter = TaskFilter {
        search: query.search.filter(|s| !s.is_empty()),
        category_id: query.category,
        priority: query.priority,
        tag_id: query.tag,
    };

    let tasks = Task::list_for_user(&state.db, auth.user_id, &filter).await?;

    let mut responses = Vec::with_capacity(tasks.len());
    for task in tasks {
        responses.push(TaskResponse::from_task(&state, task).await?);
    }

    Ok(Json(responses))
}

/// Creates a task, plus recurrence follow-ups when a repeat policy is set
///
/// # Errors
///
/// - `400 Bad Request`: unparsable due date or reminder time
/// - `403 Forbidden`: referenced category or tag belongs to another user
/// - `404 Not Found`: referenced category or tag does not exist
/// - `422 Unprocessable Entity`: empty title, bad priority, or a repeat
///   policy without a due date
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<Json<CreateTaskResponse>> {
    req.validate().map_err(ApiError::from_validation)?;

    let due_date = req.due_date.as_deref().map(parse_due_date).transpose()?;
    let reminder_at = req
        .reminder_time
        .as_deref()
        .map(parse_reminder_time)
        .transpose()?;

    // A repeat policy cannot be offset from a missing due date; reject
    // before the parent row exists.
    if req.repeat_type.repeats() && due_date.is_none() {
        return Err(ApiError::validation(
            "due_date",
            "Recurring tasks require a due date",
        ));
    }

    // Referenced category must exist and be the caller's own.
    if let Some(category_id) = req.category_id {
        let category = Category::find_by_id(&state.db, category_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Category not found".to_string()))?;
        if category.user_id != auth.user_id {
            return Err(ApiError::Forbidden(
                "Category belongs to another user".to_string(),
            ));
        }
    }

    // Every referenced tag must exist and be the caller's own.
    let mut tag_ids = req.tag_ids.clone();
    tag_ids.sort_unstable();
    tag_ids.dedup();
    if !tag_ids.is_empty() {
        let owned = Tag::count_owned(&state.db, auth.user_id, &tag_ids).await?;
        if owned != tag_ids.len() as i64 {
            return Err(ApiError::Forbidden(
                "One or more tags do not belong to you".to_string(),
            ));
        }
    }

    // One transaction for the parent, its tags, and the follow-ups: a
    // failure anywhere (say, follow-up date arithmetic overflowing) rolls
    // everything back instead of leaving an orphan parent row.
    let mut tx = state.db.begin().await?;

    let task = Task::create(
        &mut *tx,
        CreateTask {
            user_id: auth.user_id,
            category_id: req.category_id,
            title: req.title,
            description: req.description,
            priority: req.priority,
            due_date,
            repeat_type: req.repeat_type,
            repeat_interval: req.repeat_interval,
            reminder_at,
            parent_task_id: None,
        },
    )
    .await?;

    Task::attach_tags(&mut *tx, task.id, &tag_ids).await?;

    let follow_ups = recurrence::generate_follow_ups(&mut tx, &task, &tag_ids).await?;
    let follow_up_ids = follow_ups.into_iter().map(|t| t.id).collect();

    tx.commit().await?;

    tracing::info!(
        task_id = task.id,
        user_id = auth.user_id,
        repeat = ?task.repeat_type,
        "Task created"
    );

    Ok(Json(CreateTaskResponse {
        task: TaskResponse::from_task(&state, task).await?,
        follow_up_ids,
    }))
}

/// Toggles a task's completion flag
///
/// Toggling twice returns the task to its original state.
pub async fn toggle_complete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<TaskResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Task belongs to another user".to_string(),
        ));
    }

    let updated = Task::toggle_complete(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    TaskResponse::from_task(&state, updated).await.map(Json)
}

/// Delete task response
#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse {
    /// Id of the deleted task
    pub deleted: i64,
}

/// Deletes a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(id): Path<i64>,
) -> ApiResult<Json<DeleteTaskResponse>> {
    let task = Task::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;

    if task.user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Task belongs to another user".to_string(),
        ));
    }

    Task::delete(&state.db, id).await?;

    tracing::info!(task_id = id, user_id = auth.user_id, "Task deleted");

    Ok(Json(DeleteTaskResponse { deleted: id }))
}

/// Parses a "YYYY-MM-DD" due date into midnight UTC
fn parse_due_date(value: &str) -> Result<DateTime<Utc>, ApiError> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("Invalid due date: {}", value)))?;
    Ok(date.and_time(chrono::NaiveTime::MIN).and_utc())
}

/// Parses a "YYYY-MM-DDTHH:MM" reminder timestamp
fn parse_reminder_time(value: &str) -> Result<DateTime<Utc>, ApiError> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .map(|dt| dt.and_utc())
        .map_err(|_| ApiError::BadRequest(format!("Invalid reminder time: {}", value)))
}
