use axum::extract::{Path, State};

use crate::api::extract::QueryParams;
use crate::database::models::{BlogPost, PostQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/posts - published posts, newest first, with optional featured/category/limit filters
pub async fn list_posts(State(state): State<AppState>, QueryParams(query): QueryParams<PostQuery>) -> ApiResult<Vec<BlogPost>> {
    let posts = state.posts().list(query).await?;
    Ok(ApiResponse::success(posts))
}

/// GET /api/posts/:slug - a single published post
pub async fn get_post(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<BlogPost> {
    match state.posts().get_published_by_slug(&slug).await? {
        Some(post) => Ok(ApiResponse::success(post)),
        None => Err(ApiError::not_found(format!("Post '{}' not found", slug))),
    }
}
