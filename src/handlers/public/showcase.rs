use axum::extract::State;

use crate::database::models::{Achievement, JourneyItem};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /api/journey - timeline entries by display order, then year
pub async fn list_journey(State(state): State<AppState>) -> ApiResult<Vec<JourneyItem>> {
    Ok(ApiResponse::success(state.showcase().journey().await?))
}

/// GET /api/achievements - by display order
pub async fn list_achievements(State(state): State<AppState>) -> ApiResult<Vec<Achievement>> {
    Ok(ApiResponse::success(state.showcase().achievements().await?))
}
