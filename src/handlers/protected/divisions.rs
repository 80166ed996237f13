use axum::extract::State;

use super::{SlugAvailability, SlugQuery};
use crate::api::extract::{JsonBody, QueryParams, RowId};
use crate::auth::{require_admin, require_contributor, Session};
use crate::database::models::{BrandDivision, DivisionPatch, NewDivision};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// POST /api/dashboard/divisions
pub async fn create_division(
    State(state): State<AppState>,
    session: Session,
    input: Result<JsonBody<NewDivision>, ApiError>,
) -> ApiResult<BrandDivision> {
    require_admin(&session)?;
    let JsonBody(input) = input?;
    Ok(ApiResponse::created(state.divisions().create(input).await?))
}

/// GET /api/dashboard/divisions/:id
pub async fn get_division(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
) -> ApiResult<BrandDivision> {
    require_admin(&session)?;
    let RowId(id) = id?;
    state
        .divisions()
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("Division {} not found", id)))
}

/// PATCH /api/dashboard/divisions/:id
pub async fn update_division(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
    patch: Result<JsonBody<DivisionPatch>, ApiError>,
) -> ApiResult<BrandDivision> {
    require_admin(&session)?;
    let RowId(id) = id?;
    let JsonBody(patch) = patch?;
    Ok(ApiResponse::success(state.divisions().update(id, patch).await?))
}

/// DELETE /api/dashboard/divisions/:id
pub async fn delete_division(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
) -> ApiResult<BrandDivision> {
    require_admin(&session)?;
    let RowId(id) = id?;
    Ok(ApiResponse::success(state.divisions().delete(id).await?))
}

/// POST /api/dashboard/divisions/:id/toggle-featured
pub async fn toggle_featured(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
) -> ApiResult<BrandDivision> {
    require_admin(&session)?;
    let RowId(id) = id?;
    Ok(ApiResponse::success(state.divisions().toggle_featured(id).await?))
}

/// GET /api/dashboard/divisions/slug-available?slug=
pub async fn division_slug_available(
    State(state): State<AppState>,
    session: Session,
    query: Result<QueryParams<SlugQuery>, ApiError>,
) -> ApiResult<SlugAvailability> {
    require_contributor(&session)?;
    let QueryParams(query) = query?;
    let available = state.divisions().slug_available(&query.slug).await?;
    Ok(ApiResponse::success(SlugAvailability { slug: query.slug, available }))
}
