/// User endpoints
///
/// Password hashes never leave the server: every handler answers with
/// [`UserResponse`].
///
/// # Endpoints
///
/// - `GET /v1/users` - List users
/// - `POST /v1/users` - Create user
/// - `GET /v1/users/:id` - Get user
/// - `DELETE /v1/users/:id` - Delete user (owned tasks keep their owner name)
/// - `POST /v1/users/:id/admin` - Grant the ADMIN role
/// - `GET /v1/users/:id/tasks` - Owned tasks, latest due date first

use crate::{app::AppState, error::ApiResult, routes::tasks::ListTasksResponse};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskmanager_shared::{models::user::User, services::NewUser};
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Plaintext password, hashed before storage
    #[validate(length(min = 5, message = "Password must be at least 5 characters"))]
    pub password: String,

    /// Avatar image path
    #[validate(length(max = 255, message = "Avatar path must be at most 255 characters"))]
    pub avatar: Option<String>,
}

/// User as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub role: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            avatar: user.avatar,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// List users response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListUsersResponse {
    pub users: Vec<UserResponse>,
}

pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<ListUsersResponse>> {
    let users = state.services.users.find_all().await?;
    Ok(Json(ListUsersResponse {
        users: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// Creates a user without a role
///
/// # Endpoint
///
/// ```text
/// POST /v1/users
/// Content-Type: application/json
///
/// {
///   "email": "ann@mail.com",
///   "name": "Ann",
///   "password": "112233",
///   "avatar": "images/ann.jpg"
/// }
/// ```
///
/// # Errors
///
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Validation failed
pub async fn create_user(
    State(state): State<AppState>,
    Json(req): Json<CreateUserRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    req.validate()?;

    let user = state
        .services
        .users
        .create_user(NewUser {
            email: req.email,
            name: req.name,
            password: req.password,
            avatar: req.avatar,
        })
        .await?;

    tracing::info!(user_id = user.id, email = %user.email, "User registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.services.users.get_user_by_id(id).await?;
    Ok(Json(user.into()))
}

/// Deletes a user
///
/// Tasks owned by the user stay, with no owner and their owner name intact.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    state.services.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Grants the ADMIN role
///
/// # Errors
///
/// - `404 Not Found`: Unknown user, or no ADMIN role has been created
pub async fn make_admin(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.services.users.change_role_to_admin(id).await?;
    Ok(Json(user.into()))
}

/// Lists the user's tasks, latest due date first
pub async fn list_user_tasks(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<ListTasksResponse>> {
    let user = state.services.users.get_user_by_id(id).await?;
    let tasks = state
        .services
        .tasks
        .find_by_owner_order_by_date_desc(user.id)
        .await?;

    Ok(Json(ListTasksResponse { tasks }))
}
