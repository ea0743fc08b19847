//! Bookmark API endpoints.
//!
//! Mutations go through the in-memory store first (the tree authority),
//! then write through to the database and the search index.

use axum::{
    extract::{Path, State},
    Json,
};

use super::{record_audit, success, ApiResult};
use crate::errors::AppError;
use crate::models::{
    Bookmark, BookmarkNode, CreateBookmarkRequest, MoveBookmarkRequest, UpdateBookmarkRequest,
};
use crate::AppState;

/// GET /api/bookmarks - List all bookmarks in display order.
pub async fn list_bookmarks(State(state): State<AppState>) -> ApiResult<Vec<Bookmark>> {
    let store = state.store.read().await;
    success(store.snapshot())
}

/// GET /api/bookmarks/tree - The nested bookmark forest.
pub async fn get_bookmark_tree(State(state): State<AppState>) -> ApiResult<Vec<BookmarkNode>> {
    let store = state.store.read().await;
    success(store.tree())
}

/// GET /api/bookmarks/:id - Get a single bookmark.
pub async fn get_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Bookmark> {
    let store = state.store.read().await;
    match store.get(&id) {
        Some(bookmark) => success(bookmark.clone()),
        None => Err(AppError::NotFound(format!("Bookmark {} not found", id))),
    }
}

/// POST /api/bookmarks - Create a new bookmark or folder.
pub async fn create_bookmark(
    State(state): State<AppState>,
    Json(request): Json<CreateBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let created = {
        let mut store = state.store.write().await;
        store.add(&request)?
    };

    state
        .repo
        .insert_bookmark(&state.config.user_id, &created)
        .await?;

    if let Err(e) = state.search.index_bookmark(&created).await {
        tracing::warn!("Failed to index bookmark: {}", e);
    }

    record_audit(
        &state,
        "create",
        "bookmarks",
        Some(&created.id),
        None,
        serde_json::to_value(&created).ok(),
    )
    .await;

    success(created)
}

/// PUT /api/bookmarks/:id - Update a bookmark.
pub async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let (old, updated) = {
        let mut store = state.store.write().await;
        let old = store.get(&id).cloned();
        let updated = store.update(&id, &request)?;
        (old, updated)
    };

    state
        .repo
        .update_bookmark(&state.config.user_id, &updated)
        .await?;

    if let Err(e) = state.search.index_bookmark(&updated).await {
        tracing::warn!("Failed to re-index bookmark: {}", e);
    }

    record_audit(
        &state,
        "update",
        "bookmarks",
        Some(&id),
        old.and_then(|b| serde_json::to_value(&b).ok()),
        serde_json::to_value(&updated).ok(),
    )
    .await;

    success(updated)
}

/// DELETE /api/bookmarks/:id - Delete a bookmark; folders cascade to all
/// descendants.
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let removed = {
        let mut store = state.store.write().await;
        store.remove(&id)?
    };

    let removed_ids: Vec<String> = removed.iter().map(|b| b.id.clone()).collect();
    state
        .repo
        .delete_bookmarks(&state.config.user_id, &removed_ids)
        .await?;

    for removed_id in &removed_ids {
        if let Err(e) = state.search.remove_bookmark(removed_id).await {
            tracing::warn!("Failed to remove bookmark from index: {}", e);
        }
    }

    record_audit(
        &state,
        "delete",
        "bookmarks",
        Some(&id),
        serde_json::to_value(&removed).ok(),
        None,
    )
    .await;

    success(())
}

/// PUT /api/bookmarks/:id/move - Reparent and/or reorder a bookmark.
pub async fn move_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MoveBookmarkRequest>,
) -> ApiResult<Bookmark> {
    let (old, moved) = {
        let mut store = state.store.write().await;
        let old = store.get(&id).cloned();
        let moved = store.move_to(&id, request.parent_id.as_deref(), request.order_index)?;
        (old, moved)
    };

    state
        .repo
        .update_bookmark(&state.config.user_id, &moved)
        .await?;

    record_audit(
        &state,
        "move",
        "bookmarks",
        Some(&id),
        old.and_then(|b| serde_json::to_value(&b).ok()),
        serde_json::to_value(&moved).ok(),
    )
    .await;

    success(moved)
}

/// POST /api/bookmarks/:id/visit - Record a visit to a link.
pub async fn visit_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Bookmark> {
    let visited = {
        let mut store = state.store.write().await;
        store.record_visit(&id)?
    };

    state
        .repo
        .update_bookmark(&state.config.user_id, &visited)
        .await?;

    success(visited)
}
