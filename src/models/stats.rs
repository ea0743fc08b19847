//! Usage statistics model.

use serde::{Deserialize, Serialize};

/// Aggregate counts over the user's collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_bookmarks: i64,
    pub total_folders: i64,
    pub total_links: i64,
    pub total_tags: i64,
    /// Top five free-text labels by number of bookmarks carrying them.
    pub most_used_tags: Vec<String>,
}
