//! Usage statistics endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::UserStats;
use crate::AppState;

/// GET /api/stats - Aggregate counts over the user's collection.
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<UserStats> {
    let stats = state.repo.get_user_stats(&state.config.user_id).await?;
    success(stats)
}
