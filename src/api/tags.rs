//! Tag API endpoints: managed tags and their links to bookmarks.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{record_audit, success, ApiResult};
use crate::errors::AppError;
use crate::models::{AssignTagRequest, CreateTagRequest, Tag, UpdateTagRequest};
use crate::AppState;

/// GET /api/tags - List all tags.
pub async fn list_tags(State(state): State<AppState>) -> ApiResult<Vec<Tag>> {
    let tags = state.repo.list_tags().await?;
    success(tags)
}

/// POST /api/tags - Create a new tag.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(request): Json<CreateTagRequest>,
) -> ApiResult<Tag> {
    if request.name.trim().is_empty() {
        return Err(AppError::Validation("Tag name is required".to_string()));
    }

    let tag = state.repo.create_tag(&request).await?;

    record_audit(
        &state,
        "create",
        "tags",
        Some(&tag.id),
        None,
        serde_json::to_value(&tag).ok(),
    )
    .await;

    success(tag)
}

/// PUT /api/tags/:id - Update a tag.
pub async fn update_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTagRequest>,
) -> ApiResult<Tag> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(AppError::Validation("Tag name is required".to_string()));
        }
    }

    let old = state.repo.get_tag(&id).await?;
    let tag = state.repo.update_tag(&id, &request).await?;

    record_audit(
        &state,
        "update",
        "tags",
        Some(&id),
        old.and_then(|t| serde_json::to_value(&t).ok()),
        serde_json::to_value(&tag).ok(),
    )
    .await;

    success(tag)
}

/// DELETE /api/tags/:id - Delete a tag; join rows cascade.
pub async fn delete_tag(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<()> {
    let old = state.repo.get_tag(&id).await?;
    state.repo.delete_tag(&id).await?;

    record_audit(
        &state,
        "delete",
        "tags",
        Some(&id),
        old.and_then(|t| serde_json::to_value(&t).ok()),
        None,
    )
    .await;

    success(())
}

/// GET /api/bookmarks/:id/tags - Managed tags linked to a bookmark.
pub async fn list_bookmark_tags(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Tag>> {
    ensure_bookmark_exists(&state, &id).await?;
    let tags = state.repo.list_bookmark_tags(&id).await?;
    success(tags)
}

/// POST /api/bookmarks/:id/tags - Link a managed tag to a bookmark.
pub async fn assign_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AssignTagRequest>,
) -> ApiResult<Vec<Tag>> {
    ensure_bookmark_exists(&state, &id).await?;
    state.repo.assign_tag(&id, &request.tag_id).await?;

    record_audit(
        &state,
        "assign_tag",
        "bookmark_tags",
        Some(&id),
        None,
        serde_json::to_value(&request.tag_id).ok(),
    )
    .await;

    let tags = state.repo.list_bookmark_tags(&id).await?;
    success(tags)
}

/// DELETE /api/bookmarks/:id/tags/:tag_id - Unlink a managed tag.
pub async fn unassign_tag(
    State(state): State<AppState>,
    Path((id, tag_id)): Path<(String, String)>,
) -> ApiResult<Vec<Tag>> {
    ensure_bookmark_exists(&state, &id).await?;
    state.repo.unassign_tag(&id, &tag_id).await?;

    record_audit(
        &state,
        "unassign_tag",
        "bookmark_tags",
        Some(&id),
        serde_json::to_value(&tag_id).ok(),
        None,
    )
    .await;

    let tags = state.repo.list_bookmark_tags(&id).await?;
    success(tags)
}

async fn ensure_bookmark_exists(state: &AppState, id: &str) -> Result<(), AppError> {
    let store = state.store.read().await;
    if store.get(id).is_none() {
        return Err(AppError::NotFound(format!("Bookmark {} not found", id)));
    }
    Ok(())
}
