/// Task endpoints
///
/// # Endpoints
///
/// - `GET /v1/tasks` - List tasks (`?free=true` for tasks without owner)
/// - `POST /v1/tasks` - Create task
/// - `GET /v1/tasks/:id` - Get task
/// - `PUT /v1/tasks/:id` - Update name, description, date or completion
/// - `DELETE /v1/tasks/:id` - Delete task
/// - `POST /v1/tasks/:id/complete` - Mark completed
/// - `POST /v1/tasks/:id/uncomplete` - Mark not completed
/// - `POST /v1/tasks/:id/assign/:user_id` - Change owner
/// - `POST /v1/tasks/:id/unassign` - Remove owner
///
/// Ownership only changes through assign / unassign. The owner name stored on
/// a task is the one captured at creation and is never rewritten.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use taskmanager_shared::{
    models::task::{Task, UpdateTask},
    services::NewTask,
};
use validator::Validate;

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Task name must be 1-255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 1200, message = "Description must be at most 1200 characters"))]
    pub description: String,

    /// Due date, `YYYY-MM-DD`
    pub date: NaiveDate,

    #[serde(default)]
    pub is_completed: bool,

    /// Owning user; omitted for a free task
    pub owner_id: Option<i64>,
}

/// Update task request, absent fields are left unchanged
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, max = 255, message = "Task name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 1200, message = "Description must be at most 1200 characters"))]
    pub description: Option<String>,

    pub date: Option<NaiveDate>,

    pub is_completed: Option<bool>,
}

impl From<UpdateTaskRequest> for UpdateTask {
    fn from(req: UpdateTaskRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            date: req.date,
            is_completed: req.is_completed,
            owner_id: None,
        }
    }
}

/// Query parameters for `GET /v1/tasks`
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Only tasks without an owner
    #[serde(default)]
    pub free: bool,
}

/// List tasks response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListTasksResponse {
    pub tasks: Vec<Task>,
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Query(query): Query<ListTasksQuery>,
) -> ApiResult<Json<ListTasksResponse>> {
    let tasks = if query.free {
        state.services.tasks.find_free_tasks().await?
    } else {
        state.services.tasks.find_all().await?
    };

    Ok(Json(ListTasksResponse { tasks }))
}

/// Creates a task
///
/// # Endpoint
///
/// ```text
/// POST /v1/tasks
/// Content-Type: application/json
///
/// {
///   "name": "Lorem Ipsum",
///   "description": "dummy text",
///   "date": "2025-03-10",
///   "owner_id": 4
/// }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: `owner_id` names no user
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_task(
    State(state): State<AppState>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    req.validate()?;

    let task = state
        .services
        .tasks
        .create_task(NewTask {
            name: req.name,
            description: req.description,
            date: req.date,
            is_completed: req.is_completed,
            owner_id: req.owner_id,
        })
        .await?;

    tracing::info!(task_id = task.id, owner_id = ?task.owner_id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.tasks.get_task_by_id(id).await?))
}

/// Applies a partial update
///
/// # Errors
///
/// - `400 Bad Request`: Empty update
/// - `404 Not Found`: Unknown task
/// - `422 Unprocessable Entity`: Validation failed
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> ApiResult<Json<Task>> {
    req.validate()?;

    if req.name.is_none()
        && req.description.is_none()
        && req.date.is_none()
        && req.is_completed.is_none()
    {
        return Err(ApiError::BadRequest("No fields to update".to_string()));
    }

    let task = state.services.tasks.update_task(id, req.into()).await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.services.tasks.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn complete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.tasks.set_task_completed(id).await?))
}

pub async fn uncomplete_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.tasks.set_task_not_completed(id).await?))
}

/// Makes `user_id` the task's owner
///
/// # Errors
///
/// - `404 Not Found`: Unknown task or user
pub async fn assign_task(
    State(state): State<AppState>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.tasks.assign_task_to_user(id, user_id).await?))
}

pub async fn unassign_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Task>> {
    Ok(Json(state.services.tasks.unassign_task(id).await?))
}
