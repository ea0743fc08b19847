//! Bookmark model matching the frontend Bookmark interface.

use serde::{Deserialize, Serialize};

/// Kind of a bookmark node: a folder that can contain children, or a link.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookmarkType {
    Folder,
    Link,
}

impl BookmarkType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookmarkType::Folder => "folder",
            BookmarkType::Link => "link",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "folder" => Some(BookmarkType::Folder),
            "link" => Some(BookmarkType::Link),
            _ => None,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, BookmarkType::Folder)
    }
}

/// A bookmark node: either a folder or a link in the hierarchical collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub bookmark_type: BookmarkType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-text labels; distinct from managed tags linked via bookmark_tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub order_index: i64,
    pub is_favorite: bool,
    pub visit_count: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_visited_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// A bookmark with its children nested, for tree responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    #[serde(flatten)]
    pub bookmark: Bookmark,
    pub children: Vec<BookmarkNode>,
}

/// Request body for creating a new bookmark.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkRequest {
    pub title: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub bookmark_type: BookmarkType,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

/// Request body for updating an existing bookmark.
///
/// `id`, `type` and `createdAt` are immutable; reparenting goes through the
/// move operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBookmarkRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub is_favorite: Option<bool>,
}

/// Request body for moving a bookmark to a new parent and/or position.
///
/// A missing `parentId` moves the node to the root level.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveBookmarkRequest {
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order_index: Option<i64>,
}
