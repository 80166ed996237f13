use axum::extract::State;

use crate::api::extract::{JsonBody, RowId};
use crate::auth::{require_admin, Session};
use crate::database::models::{NewUser, User, UserPatch};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/dashboard/users
pub async fn list_users(State(state): State<AppState>, session: Session) -> ApiResult<Vec<User>> {
    require_admin(&session)?;
    Ok(ApiResponse::success(state.users().list().await?))
}

/// POST /api/dashboard/users
pub async fn create_user(
    State(state): State<AppState>,
    session: Session,
    input: Result<JsonBody<NewUser>, ApiError>,
) -> ApiResult<User> {
    let admin = require_admin(&session)?;
    let JsonBody(input) = input?;
    let user = state.users().create(input).await?;
    tracing::info!("Admin {} created user {}", admin.id, user.id);
    Ok(ApiResponse::created(user))
}

/// GET /api/dashboard/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
) -> ApiResult<User> {
    require_admin(&session)?;
    let RowId(id) = id?;
    state
        .users()
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", id)))
}

/// PATCH /api/dashboard/users/:id - includes role changes
pub async fn update_user(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
    patch: Result<JsonBody<UserPatch>, ApiError>,
) -> ApiResult<User> {
    require_admin(&session)?;
    let RowId(id) = id?;
    let JsonBody(patch) = patch?;
    Ok(ApiResponse::success(state.users().update(id, patch).await?))
}
