//! UI state endpoints: the store's selection and folder-expansion surface.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::store::Selection;
use crate::AppState;

/// Current UI state.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiStateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_id: Option<String>,
    pub expanded_folder_ids: Vec<String>,
}

/// Request body for changing the selection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub auto_switch_tab: bool,
}

/// Result of a folder toggle.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleFolderResponse {
    pub folder_id: String,
    pub expanded: bool,
}

/// GET /api/ui/state - Selection and expanded folders.
pub async fn get_ui_state(State(state): State<AppState>) -> ApiResult<UiStateResponse> {
    let store = state.store.read().await;
    success(UiStateResponse {
        selected_id: store.selected_id().map(|s| s.to_string()),
        expanded_folder_ids: store.expanded_folder_ids(),
    })
}

/// PUT /api/ui/selection - Set or clear the active selection.
///
/// The response tells the caller whether the detail view should switch to
/// its embedded-page tab; there is no out-of-band signaling.
pub async fn set_selection(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<Selection> {
    let mut store = state.store.write().await;
    let selection = store.select(request.id.as_deref(), request.auto_switch_tab)?;
    success(selection)
}

/// POST /api/ui/folders/:id/toggle - Flip a folder's expanded state.
pub async fn toggle_folder(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ToggleFolderResponse> {
    let mut store = state.store.write().await;
    let expanded = store.toggle_folder(&id);
    success(ToggleFolderResponse {
        folder_id: id,
        expanded,
    })
}
