//! Settings API endpoints, including JSON export and strict import.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;

use super::{record_audit, success, ApiResult};
use crate::errors::AppError;
use crate::models::{SettingsPatch, UserSettings, SETTINGS_SCHEMA_VERSION};
use crate::AppState;

/// GET /api/settings - Current settings, falling back to defaults.
pub async fn get_settings(State(state): State<AppState>) -> ApiResult<UserSettings> {
    let settings = state
        .repo
        .get_settings(&state.config.user_id)
        .await?
        .unwrap_or_default();
    success(settings)
}

/// PUT /api/settings - Merge the provided fields into current settings.
pub async fn update_settings(
    State(state): State<AppState>,
    Json(patch): Json<SettingsPatch>,
) -> ApiResult<UserSettings> {
    let merged = apply_patch(&state, &patch, "update").await?;
    success(merged)
}

/// GET /api/settings/export - Download the settings as a JSON file.
///
/// The body is the full settings object serialized with 2-space
/// indentation; the suggested filename carries the current ISO date.
pub async fn export_settings(State(state): State<AppState>) -> Result<Response, AppError> {
    let settings = state
        .repo
        .get_settings(&state.config.user_id)
        .await?
        .unwrap_or_default();

    let body = serde_json::to_string_pretty(&settings)
        .map_err(|e| AppError::Internal(format!("Failed to serialize settings: {}", e)))?;
    let filename = format!("favoritos-config-{}.json", Utc::now().format("%Y-%m-%d"));

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response())
}

/// POST /api/settings/import - Import a previously exported settings file.
///
/// The payload must be a JSON object matching the closed settings schema;
/// unknown keys are rejected rather than silently merged. Provided fields
/// shallow-merge into the current settings.
pub async fn import_settings(
    State(state): State<AppState>,
    body: String,
) -> ApiResult<UserSettings> {
    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| AppError::Validation(format!("Invalid settings file: {}", e)))?;

    if !value.is_object() {
        return Err(AppError::Validation(
            "Settings import must be a JSON object".to_string(),
        ));
    }

    let patch: SettingsPatch = serde_json::from_value(value)
        .map_err(|e| AppError::Validation(format!("Invalid settings file: {}", e)))?;

    let merged = apply_patch(&state, &patch, "import").await?;
    success(merged)
}

/// Validate the patch version, merge, persist, and audit.
async fn apply_patch(
    state: &AppState,
    patch: &SettingsPatch,
    action: &str,
) -> Result<UserSettings, AppError> {
    if let Some(version) = patch.schema_version {
        if version != SETTINGS_SCHEMA_VERSION {
            return Err(AppError::Validation(format!(
                "Unsupported settings schema version {}",
                version
            )));
        }
    }

    let current = state
        .repo
        .get_settings(&state.config.user_id)
        .await?
        .unwrap_or_default();

    let mut merged = current.clone();
    merged.apply(patch);

    state
        .repo
        .upsert_settings(&state.config.user_id, &merged)
        .await?;

    record_audit(
        state,
        action,
        "user_settings",
        Some(&state.config.user_id),
        serde_json::to_value(&current).ok(),
        serde_json::to_value(&merged).ok(),
    )
    .await;

    Ok(merged)
}
