//! Backup record model.

use serde::{Deserialize, Serialize};

/// Record of an exported data snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub id: String,
    pub filename: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<i64>,
    pub backup_type: String,
    pub status: String,
    pub created_at: String,
}

/// Request body for creating a backup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBackupRequest {
    #[serde(default)]
    pub backup_type: Option<String>,
}
