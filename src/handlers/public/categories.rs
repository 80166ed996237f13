use axum::extract::State;

use crate::database::models::BlogCategory;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/categories - all categories in creation order
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<BlogCategory>> {
    Ok(ApiResponse::success(state.categories().list().await?))
}
