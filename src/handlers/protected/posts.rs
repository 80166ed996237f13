use axum::extract::State;

use super::{SlugAvailability, SlugQuery};
use crate::api::extract::{JsonBody, QueryParams, RowId};
use crate::auth::{require_admin, require_contributor, require_editor, Session};
use crate::database::models::{BlogPost, NewPost, PostPatch, PostQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/dashboard/posts - like the public list, drafts included
pub async fn list_posts(
    State(state): State<AppState>,
    session: Session,
    query: Result<QueryParams<PostQuery>, ApiError>,
) -> ApiResult<Vec<BlogPost>> {
    require_contributor(&session)?;
    let QueryParams(query) = query?;
    Ok(ApiResponse::success(state.posts().list_all(query).await?))
}

/// POST /api/dashboard/posts
pub async fn create_post(
    State(state): State<AppState>,
    session: Session,
    input: Result<JsonBody<NewPost>, ApiError>,
) -> ApiResult<BlogPost> {
    require_contributor(&session)?;
    let JsonBody(input) = input?;
    Ok(ApiResponse::created(state.posts().create(input).await?))
}

/// GET /api/dashboard/posts/:id
pub async fn get_post(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
) -> ApiResult<BlogPost> {
    require_contributor(&session)?;
    let RowId(id) = id?;
    state
        .posts()
        .get_by_id(id)
        .await?
        .map(ApiResponse::success)
        .ok_or_else(|| ApiError::not_found(format!("Post {} not found", id)))
}

/// PATCH /api/dashboard/posts/:id
pub async fn update_post(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
    patch: Result<JsonBody<PostPatch>, ApiError>,
) -> ApiResult<BlogPost> {
    require_editor(&session)?;
    let RowId(id) = id?;
    let JsonBody(patch) = patch?;
    Ok(ApiResponse::success(state.posts().update(id, patch).await?))
}

/// DELETE /api/dashboard/posts/:id
pub async fn delete_post(
    State(state): State<AppState>,
    session: Session,
    id: Result<RowId, ApiError>,
) -> ApiResult<BlogPost> {
    require_admin(&session)?;
    let RowId(id) = id?;
    Ok(ApiResponse::success(state.posts().delete(id).await?))
}

/// GET /api/dashboard/posts/slug-available?slug=
pub async fn post_slug_available(
    State(state): State<AppState>,
    session: Session,
    query: Result<QueryParams<SlugQuery>, ApiError>,
) -> ApiResult<SlugAvailability> {
    require_contributor(&session)?;
    let QueryParams(query) = query?;
    let available = state.posts().slug_available(&query.slug).await?;
    Ok(ApiResponse::success(SlugAvailability { slug: query.slug, available }))
}
