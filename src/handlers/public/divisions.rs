use axum::extract::{Path, State};
use serde::Deserialize;

use crate::api::extract::QueryParams;
use crate::database::models::BrandDivision;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DivisionQuery {
    pub featured: Option<bool>,
}

/// GET /api/divisions - featured first, then by name; `?featured=true` keeps only featured rows
pub async fn list_divisions(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<DivisionQuery>,
) -> ApiResult<Vec<BrandDivision>> {
    let divisions = state.divisions().list(query.featured.unwrap_or(false)).await?;
    Ok(ApiResponse::success(divisions))
}

/// GET /api/divisions/:slug
pub async fn get_division(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<BrandDivision> {
    state
        .divisions()
        .get_by_slug(&slug)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("Division '{}' not found", slug)))
}
