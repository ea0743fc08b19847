//! REST API module.
//!
//! Contains all API routes and handlers following the frontend contract.

mod audit;
mod backups;
mod bookmarks;
mod profile;
mod search;
mod settings;
mod stats;
mod tags;
mod ui;

pub use audit::*;
pub use backups::*;
pub use bookmarks::*;
pub use profile::*;
pub use search::*;
pub use settings::*;
pub use stats::*;
pub use tags::*;
pub use ui::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, crate::errors::AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// Append an audit entry; failures are logged, never surfaced.
pub(crate) async fn record_audit(
    state: &AppState,
    action: &str,
    target_table: &str,
    target_id: Option<&str>,
    old_values: Option<serde_json::Value>,
    new_values: Option<serde_json::Value>,
) {
    if let Err(e) = state
        .repo
        .append_audit(
            &state.config.user_id,
            action,
            target_table,
            target_id,
            old_values,
            new_values,
        )
        .await
    {
        tracing::warn!("Failed to append audit entry: {}", e);
    }
}
