//! Audit log endpoint.

use axum::extract::{Query, State};
use serde::Deserialize;

use super::{success, ApiResult};
use crate::models::AuditEntry;
use crate::AppState;

/// Audit listing parameters.
#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    /// Maximum number of entries (default: 50).
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    50
}

/// Maximum number of audit entries returned per request.
const MAX_AUDIT_LIMIT: i64 = 500;

/// GET /api/audit - Most recent audit entries, newest first.
pub async fn list_audit(
    State(state): State<AppState>,
    Query(params): Query<AuditQuery>,
) -> ApiResult<Vec<AuditEntry>> {
    let limit = params.limit.clamp(1, MAX_AUDIT_LIMIT);
    let entries = state.repo.list_audit(&state.config.user_id, limit).await?;
    success(entries)
}
