//! Backup endpoints: snapshot the collection to a JSON file and record it.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use super::{record_audit, success, ApiResult};
use crate::errors::AppError;
use crate::models::{Backup, Bookmark, CreateBackupRequest, Tag, UserSettings};
use crate::AppState;

/// Snapshot written to a backup file.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BackupSnapshot {
    generated_at: String,
    bookmarks: Vec<Bookmark>,
    tags: Vec<Tag>,
    settings: UserSettings,
}

/// GET /api/backups - Backup records, newest first.
pub async fn list_backups(State(state): State<AppState>) -> ApiResult<Vec<Backup>> {
    let backups = state.repo.list_backups(&state.config.user_id).await?;
    success(backups)
}

/// POST /api/backups - Write a snapshot file and record the attempt.
pub async fn create_backup(
    State(state): State<AppState>,
    Json(request): Json<CreateBackupRequest>,
) -> ApiResult<Backup> {
    let now = Utc::now();
    let backup_type = request.backup_type.unwrap_or_else(|| "manual".to_string());

    let bookmarks = {
        let store = state.store.read().await;
        store.snapshot()
    };
    let snapshot = BackupSnapshot {
        generated_at: now.to_rfc3339(),
        bookmarks,
        tags: state.repo.list_tags().await?,
        settings: state
            .repo
            .get_settings(&state.config.user_id)
            .await?
            .unwrap_or_default(),
    };

    let body = serde_json::to_string_pretty(&snapshot)
        .map_err(|e| AppError::Internal(format!("Failed to serialize backup: {}", e)))?;
    let filename = format!("favoritos-backup-{}.json", now.format("%Y%m%dT%H%M%S"));
    let path = state.config.backup_dir.join(&filename);

    tokio::fs::create_dir_all(&state.config.backup_dir)
        .await
        .ok();

    let backup = match tokio::fs::write(&path, body.as_bytes()).await {
        Ok(()) => Backup {
            id: Uuid::new_v4().to_string(),
            filename,
            file_size: Some(body.len() as i64),
            backup_type,
            status: "completed".to_string(),
            created_at: now.to_rfc3339(),
        },
        Err(e) => {
            let failed = Backup {
                id: Uuid::new_v4().to_string(),
                filename,
                file_size: None,
                backup_type,
                status: "failed".to_string(),
                created_at: now.to_rfc3339(),
            };
            if let Err(db_err) = state.repo.insert_backup(&state.config.user_id, &failed).await {
                tracing::warn!("Failed to record failed backup: {}", db_err);
            }
            return Err(AppError::Internal(format!(
                "Failed to write backup file: {}",
                e
            )));
        }
    };

    state
        .repo
        .insert_backup(&state.config.user_id, &backup)
        .await?;

    record_audit(
        &state,
        "create",
        "backups",
        Some(&backup.id),
        None,
        serde_json::to_value(&backup).ok(),
    )
    .await;

    success(backup)
}
