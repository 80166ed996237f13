use axum::extract::State;

use super::{SlugAvailability, SlugQuery};
use crate::api::extract::{JsonBody, QueryParams, RowId};
use crate::auth::{require_admin, require_contributor, require_editor, Session};
use crate::database::models::{BlogCategory, CategoryPatch, NewCategory};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/dashboard/categories
pub async fn create_category(
    State(state): State<AppState>,
    session: Session,
    input: Result<JsonBody<NewCategory>, ApiError>,
) -> ApiResult<BlogCategory> {
    require_editor(&session)?;
    let JsonBody(input) = input?;
    Ok(ApiResponse::created(state.categories().create(input).await?))
}

/// PATCH /api/dashboard/categories/:id
pub async fn update_category(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
    patch: Result<JsonBody<CategoryPatch>, ApiError>,
) -> ApiResult<BlogCategory> {
    require_editor(&session)?;
    let RowId(id) = id?;
    let JsonBody(patch) = patch?;
    Ok(ApiResponse::success(state.categories().update(id, patch).await?))
}

/// DELETE /api/dashboard/categories/:id
pub async fn delete_category(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
) -> ApiResult<BlogCategory> {
    require_admin(&session)?;
    let RowId(id) = id?;
    Ok(ApiResponse::success(state.categories().delete(id).await?))
}

/// GET /api/dashboard/categories/slug-available?slug=
pub async fn category_slug_available(
    State(state): State<AppState>,
    session: Session,
    query: Result<QueryParams<SlugQuery>, ApiError>,
) -> ApiResult<SlugAvailability> {
    require_contributor(&session)?;
    let QueryParams(query) = query?;
    let available = state.categories().slug_available(&query.slug).await?;
    Ok(ApiResponse::success(SlugAvailability { slug: query.slug, available }))
}
