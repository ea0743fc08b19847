//! Search API endpoints.

use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use crate::models::Bookmark;
use crate::AppState;

use super::{success, ApiResult};

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string.
    pub q: String,
    /// Maximum number of results (default: 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

/// Search result with bookmarks and metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Single search result item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub bookmark: Bookmark,
    pub score: f32,
}

/// Maximum number of search results allowed.
const MAX_SEARCH_LIMIT: usize = 100;

/// GET /api/search - Search for bookmarks.
pub async fn search_bookmarks(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    // Limit the maximum number of results
    let limit = params.limit.min(MAX_SEARCH_LIMIT);

    let search_results = state.search.search(&params.q, limit, params.offset)?;

    // Hydrate full bookmark data from the store
    let store = state.store.read().await;
    let results: Vec<SearchResultItem> = search_results
        .into_iter()
        .filter_map(|sr| {
            store.get(&sr.bookmark_id).map(|bookmark| SearchResultItem {
                bookmark: bookmark.clone(),
                score: sr.score,
            })
        })
        .collect();

    let total = results.len();

    success(SearchResponse {
        results,
        total,
        limit,
        offset: params.offset,
    })
}
