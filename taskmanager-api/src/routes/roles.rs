/// Role endpoints
///
/// # Endpoints
///
/// - `GET /v1/roles` - List roles
/// - `POST /v1/roles` - Create role

use crate::{app::AppState, error::ApiResult};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use taskmanager_shared::models::role::{CreateRole, Role};
use validator::Validate;

/// Create role request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRoleRequest {
    /// Role name, e.g. "ADMIN"
    #[validate(length(min = 1, max = 64, message = "Role name must be 1-64 characters"))]
    pub name: String,
}

/// List roles response
#[derive(Debug, Serialize, Deserialize)]
pub struct ListRolesResponse {
    pub roles: Vec<Role>,
}

/// Lists all roles in creation order
pub async fn list_roles(State(state): State<AppState>) -> ApiResult<Json<ListRolesResponse>> {
    let roles = state.services.roles.find_all().await?;
    Ok(Json(ListRolesResponse { roles }))
}

/// Creates a role
///
/// Names are not unique; posting the same name twice creates two roles.
///
/// # Endpoint
///
/// ```text
/// POST /v1/roles
/// Content-Type: application/json
///
/// { "name": "ADMIN" }
/// ```
///
/// # Errors
///
/// - `422 Unprocessable Entity`: Empty or overlong name
pub async fn create_role(
    State(state): State<AppState>,
    Json(req): Json<CreateRoleRequest>,
) -> ApiResult<(StatusCode, Json<Role>)> {
    req.validate()?;

    let role = state.services.roles.create_role(CreateRole::new(req.name)).await?;

    tracing::info!(role_id = role.id, name = %role.name, "Role created");
    Ok((StatusCode::CREATED, Json(role)))
}
