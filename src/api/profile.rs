//! Profile API endpoints.

use axum::{extract::State, Json};

use super::{record_audit, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Profile, UpdateProfileRequest};
use crate::AppState;

/// GET /api/profile - The user's profile.
pub async fn get_profile(State(state): State<AppState>) -> ApiResult<Profile> {
    match state.repo.get_profile(&state.config.user_id).await? {
        Some(profile) => success(profile),
        None => Err(AppError::NotFound("Profile not found".to_string())),
    }
}

/// PUT /api/profile - Create or update the profile.
pub async fn update_profile(
    State(state): State<AppState>,
    Json(request): Json<UpdateProfileRequest>,
) -> ApiResult<Profile> {
    let old = state.repo.get_profile(&state.config.user_id).await?;
    let profile = state
        .repo
        .upsert_profile(&state.config.user_id, &request)
        .await?;

    record_audit(
        &state,
        "update",
        "profiles",
        Some(&state.config.user_id),
        old.and_then(|p| serde_json::to_value(&p).ok()),
        serde_json::to_value(&profile).ok(),
    )
    .await;

    success(profile)
}
