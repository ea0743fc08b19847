//! Audit log entry model.

use serde::{Deserialize, Serialize};

/// One audit trail entry, appended on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub action: String,
    pub target_table: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_values: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_values: Option<serde_json::Value>,
    pub created_at: String,
}
