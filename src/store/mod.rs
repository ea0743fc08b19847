//! In-memory bookmark store: the tree authority for the application.
//!
//! Owns the ordered forest of bookmark nodes plus the UI state attached to
//! it (current selection, expanded folders) and enforces tree consistency
//! on every mutation: links never gain children, parents must be existing
//! folders, and moves that would create a parentage cycle are rejected.
//!
//! The store is purely in-memory and synchronous. Persistence and search
//! indexing are write-through concerns of the HTTP layer, which holds the
//! store behind a single `RwLock` so mutations run to completion one at a
//! time.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{
    Bookmark, BookmarkNode, BookmarkType, CreateBookmarkRequest, UpdateBookmarkRequest,
};

/// Errors produced by store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Missing required field, or parent does not resolve to a folder
    Validation(String),
    /// Referenced id does not exist
    NotFound(String),
    /// Move would create a parentage cycle
    Cycle(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Validation(msg) => write!(f, "validation error: {}", msg),
            StoreError::NotFound(msg) => write!(f, "not found: {}", msg),
            StoreError::Cycle(msg) => write!(f, "cycle: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Result of a selection change, handed to the detail view by the caller.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub selected_id: Option<String>,
    /// Whether the detail view should switch to its embedded-page tab.
    pub switch_to_detail: bool,
}

/// The bookmark forest with selection and expansion state.
#[derive(Debug, Default)]
pub struct BookmarkStore {
    nodes: HashMap<String, Bookmark>,
    selected: Option<String>,
    expanded: HashSet<String>,
}

impl BookmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from persisted rows. Rows are trusted to satisfy the
    /// tree invariants, which the schema's foreign key guarantees.
    pub fn from_rows(rows: Vec<Bookmark>) -> Self {
        let nodes = rows.into_iter().map(|b| (b.id.clone(), b)).collect();
        Self {
            nodes,
            selected: None,
            expanded: HashSet::new(),
        }
    }

    fn now() -> String {
        Utc::now().to_rfc3339()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Bookmark> {
        self.nodes.get(id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Expanded folder ids, sorted for stable responses.
    pub fn expanded_folder_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.expanded.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Direct children of the given parent (or the roots), in display order.
    pub fn children(&self, parent_id: Option<&str>) -> Vec<&Bookmark> {
        let mut children: Vec<&Bookmark> = self
            .nodes
            .values()
            .filter(|b| b.parent_id.as_deref() == parent_id)
            .collect();
        children.sort_by(|a, b| {
            (a.order_index, &a.created_at, &a.id).cmp(&(b.order_index, &b.created_at, &b.id))
        });
        children
    }

    pub fn roots(&self) -> Vec<&Bookmark> {
        self.children(None)
    }

    /// The whole collection flattened in depth-first display order.
    pub fn snapshot(&self) -> Vec<Bookmark> {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.flatten_into(None, &mut out);
        out
    }

    fn flatten_into(&self, parent_id: Option<&str>, out: &mut Vec<Bookmark>) {
        for child in self.children(parent_id) {
            out.push(child.clone());
            if child.bookmark_type.is_folder() {
                self.flatten_into(Some(&child.id), out);
            }
        }
    }

    /// The nested forest, for tree responses.
    pub fn tree(&self) -> Vec<BookmarkNode> {
        self.roots().into_iter().map(|b| self.build_node(b)).collect()
    }

    fn build_node(&self, bookmark: &Bookmark) -> BookmarkNode {
        let children = if bookmark.bookmark_type.is_folder() {
            self.children(Some(&bookmark.id))
                .into_iter()
                .map(|c| self.build_node(c))
                .collect()
        } else {
            Vec::new()
        };
        BookmarkNode {
            bookmark: bookmark.clone(),
            children,
        }
    }

    /// Transitive descendant ids of a node, parents before children.
    pub fn descendant_ids(&self, id: &str) -> Vec<String> {
        let mut out = Vec::new();
        let mut queue = vec![id.to_string()];
        while let Some(current) = queue.pop() {
            for child in self.children(Some(&current)) {
                out.push(child.id.clone());
                queue.push(child.id.clone());
            }
        }
        out
    }

    fn next_order_index(&self, parent_id: Option<&str>) -> i64 {
        self.children(parent_id)
            .iter()
            .map(|b| b.order_index)
            .max()
            .map(|max| max + 1)
            .unwrap_or(0)
    }

    /// Checks that a parent reference points at an existing folder.
    fn resolve_parent_folder(&self, parent_id: &str) -> Result<&Bookmark, StoreError> {
        let parent = self.nodes.get(parent_id).ok_or_else(|| {
            StoreError::Validation(format!("Parent folder {} does not exist", parent_id))
        })?;
        if !parent.bookmark_type.is_folder() {
            return Err(StoreError::Validation(format!(
                "Parent {} is a link and cannot contain children",
                parent_id
            )));
        }
        Ok(parent)
    }

    /// Insert a new node under the given parent (or at the root).
    ///
    /// Links require a URL; folders never carry one. The new node gets a
    /// fresh id, both timestamps, and the next order index among its
    /// siblings.
    pub fn add(&mut self, request: &CreateBookmarkRequest) -> Result<Bookmark, StoreError> {
        if request.title.trim().is_empty() {
            return Err(StoreError::Validation("Title is required".to_string()));
        }

        let url = match request.bookmark_type {
            BookmarkType::Link => match &request.url {
                Some(url) if !url.trim().is_empty() => Some(url.clone()),
                _ => {
                    return Err(StoreError::Validation(
                        "A link requires a URL".to_string(),
                    ))
                }
            },
            BookmarkType::Folder => None,
        };

        if let Some(parent_id) = &request.parent_id {
            self.resolve_parent_folder(parent_id)?;
        }

        let now = Self::now();
        let bookmark = Bookmark {
            id: Uuid::new_v4().to_string(),
            title: request.title.clone(),
            url,
            icon: request.icon.clone(),
            bookmark_type: request.bookmark_type,
            parent_id: request.parent_id.clone(),
            description: request.description.clone(),
            tags: request.tags.clone(),
            order_index: self.next_order_index(request.parent_id.as_deref()),
            is_favorite: false,
            visit_count: 0,
            last_visited_at: None,
            created_at: now.clone(),
            updated_at: now,
        };

        self.nodes.insert(bookmark.id.clone(), bookmark.clone());
        Ok(bookmark)
    }

    /// Merge fields into an existing node and refresh `updatedAt`.
    pub fn update(
        &mut self,
        id: &str,
        request: &UpdateBookmarkRequest,
    ) -> Result<Bookmark, StoreError> {
        if let Some(title) = &request.title {
            if title.trim().is_empty() {
                return Err(StoreError::Validation("Title is required".to_string()));
            }
        }

        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("Bookmark {} not found", id)))?;

        if let Some(title) = &request.title {
            node.title = title.clone();
        }
        if request.url.is_some() && node.bookmark_type == BookmarkType::Link {
            node.url = request.url.clone();
        }
        if request.icon.is_some() {
            node.icon = request.icon.clone();
        }
        if request.description.is_some() {
            node.description = request.description.clone();
        }
        if request.tags.is_some() {
            node.tags = request.tags.clone();
        }
        if let Some(is_favorite) = request.is_favorite {
            node.is_favorite = is_favorite;
        }
        node.updated_at = Self::now();

        Ok(node.clone())
    }

    /// Bump the visit counter and stamp the visit time.
    pub fn record_visit(&mut self, id: &str) -> Result<Bookmark, StoreError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("Bookmark {} not found", id)))?;

        let now = Self::now();
        node.visit_count += 1;
        node.last_visited_at = Some(now.clone());
        node.updated_at = now;

        Ok(node.clone())
    }

    /// Remove a node and all of its transitive descendants.
    ///
    /// Returns the removed nodes, parents before children. Clears the
    /// selection if it pointed into the removed subtree and drops removed
    /// folders from the expanded set.
    pub fn remove(&mut self, id: &str) -> Result<Vec<Bookmark>, StoreError> {
        if !self.nodes.contains_key(id) {
            return Err(StoreError::NotFound(format!("Bookmark {} not found", id)));
        }

        let mut removed_ids = vec![id.to_string()];
        removed_ids.extend(self.descendant_ids(id));

        let mut removed = Vec::with_capacity(removed_ids.len());
        for removed_id in &removed_ids {
            if let Some(node) = self.nodes.remove(removed_id) {
                removed.push(node);
            }
            self.expanded.remove(removed_id);
            if self.selected.as_deref() == Some(removed_id.as_str()) {
                self.selected = None;
            }
        }

        Ok(removed)
    }

    /// Reparent and/or reorder a node.
    ///
    /// A `None` parent moves the node to the root level. Without an
    /// explicit order the node lands at the end of its new sibling list.
    pub fn move_to(
        &mut self,
        id: &str,
        new_parent_id: Option<&str>,
        new_order: Option<i64>,
    ) -> Result<Bookmark, StoreError> {
        if !self.nodes.contains_key(id) {
            return Err(StoreError::NotFound(format!("Bookmark {} not found", id)));
        }

        if let Some(parent_id) = new_parent_id {
            let parent = self
                .nodes
                .get(parent_id)
                .ok_or_else(|| StoreError::NotFound(format!("Folder {} not found", parent_id)))?;
            if !parent.bookmark_type.is_folder() {
                return Err(StoreError::Validation(format!(
                    "Parent {} is a link and cannot contain children",
                    parent_id
                )));
            }

            // Walk up from the target parent; hitting the moved node means
            // the move would put the node inside its own subtree.
            let mut cursor = Some(parent_id.to_string());
            while let Some(current) = cursor {
                if current == id {
                    return Err(StoreError::Cycle(format!(
                        "Cannot move {} under its own descendant {}",
                        id, parent_id
                    )));
                }
                cursor = self
                    .nodes
                    .get(&current)
                    .and_then(|node| node.parent_id.clone());
            }
        }

        let order_index =
            new_order.unwrap_or_else(|| self.next_order_index(new_parent_id));

        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("Bookmark {} not found", id)))?;
        node.parent_id = new_parent_id.map(|s| s.to_string());
        node.order_index = order_index;
        node.updated_at = Self::now();

        Ok(node.clone())
    }

    /// Set (or clear) the active selection. No tree mutation.
    ///
    /// The returned `Selection` tells the caller whether the detail view
    /// should switch to its embedded-page tab.
    pub fn select(
        &mut self,
        id: Option<&str>,
        auto_switch_tab: bool,
    ) -> Result<Selection, StoreError> {
        if let Some(id) = id {
            if !self.nodes.contains_key(id) {
                return Err(StoreError::NotFound(format!("Bookmark {} not found", id)));
            }
        }

        self.selected = id.map(|s| s.to_string());
        Ok(Selection {
            selected_id: self.selected.clone(),
            switch_to_detail: auto_switch_tab && self.selected.is_some(),
        })
    }

    /// Flip a folder's membership in the expanded set; returns the new
    /// state. Both presence and absence are valid, so no validation.
    pub fn toggle_folder(&mut self, folder_id: &str) -> bool {
        if self.expanded.remove(folder_id) {
            false
        } else {
            self.expanded.insert(folder_id.to_string());
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn folder(title: &str, parent_id: Option<&str>) -> CreateBookmarkRequest {
        CreateBookmarkRequest {
            title: title.to_string(),
            url: None,
            icon: None,
            bookmark_type: BookmarkType::Folder,
            parent_id: parent_id.map(|s| s.to_string()),
            description: None,
            tags: None,
        }
    }

    fn link(title: &str, url: Option<&str>, parent_id: Option<&str>) -> CreateBookmarkRequest {
        CreateBookmarkRequest {
            title: title.to_string(),
            url: url.map(|s| s.to_string()),
            icon: None,
            bookmark_type: BookmarkType::Link,
            parent_id: parent_id.map(|s| s.to_string()),
            description: None,
            tags: None,
        }
    }

    #[test]
    fn folder_creation_has_no_url() {
        let mut store = BookmarkStore::new();
        let mut request = folder("Work", None);
        request.url = Some("https://ignored.example".to_string());

        let created = store.add(&request).unwrap();
        assert_eq!(created.bookmark_type, BookmarkType::Folder);
        assert!(created.url.is_none());
        assert_eq!(created.created_at, created.updated_at);
    }

    #[test]
    fn link_without_url_is_rejected() {
        let mut store = BookmarkStore::new();
        let err = store.add(&link("Docs", None, None)).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let err = store.add(&link("Docs", Some("  "), None)).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn empty_title_is_rejected() {
        let mut store = BookmarkStore::new();
        let err = store.add(&folder("   ", None)).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn parent_must_be_an_existing_folder() {
        let mut store = BookmarkStore::new();
        let err = store
            .add(&link("Docs", Some("https://x.com"), Some("missing")))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let l = store.add(&link("Docs", Some("https://x.com"), None)).unwrap();
        let err = store
            .add(&link("Nested", Some("https://y.com"), Some(&l.id)))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn siblings_get_increasing_order_indexes() {
        let mut store = BookmarkStore::new();
        let f = store.add(&folder("Work", None)).unwrap();
        let a = store
            .add(&link("A", Some("https://a.com"), Some(&f.id)))
            .unwrap();
        let b = store
            .add(&link("B", Some("https://b.com"), Some(&f.id)))
            .unwrap();

        assert!(a.order_index < b.order_index);
        let children = store.children(Some(&f.id));
        assert_eq!(
            children.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            vec![a.id.as_str(), b.id.as_str()]
        );
    }

    #[test]
    fn update_keeps_id_and_created_at_and_advances_updated_at() {
        let mut store = BookmarkStore::new();
        let created = store.add(&link("Docs", Some("https://x.com"), None)).unwrap();

        let request = UpdateBookmarkRequest {
            title: Some("Documentation".to_string()),
            description: Some("reference".to_string()),
            ..Default::default()
        };
        let updated = store.update(&created.id, &request).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.title, "Documentation");
        assert_eq!(updated.description.as_deref(), Some("reference"));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = BookmarkStore::new();
        let err = store
            .update("missing", &UpdateBookmarkRequest::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn update_cannot_clear_title_or_give_folders_urls() {
        let mut store = BookmarkStore::new();
        let f = store.add(&folder("Work", None)).unwrap();

        let err = store
            .update(
                &f.id,
                &UpdateBookmarkRequest {
                    title: Some("".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));

        let updated = store
            .update(
                &f.id,
                &UpdateBookmarkRequest {
                    url: Some("https://x.com".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(updated.url.is_none());
    }

    #[test]
    fn record_visit_bumps_count_and_stamps_time() {
        let mut store = BookmarkStore::new();
        let l = store.add(&link("Docs", Some("https://x.com"), None)).unwrap();

        let visited = store.record_visit(&l.id).unwrap();
        assert_eq!(visited.visit_count, 1);
        assert!(visited.last_visited_at.is_some());

        let visited = store.record_visit(&l.id).unwrap();
        assert_eq!(visited.visit_count, 2);
    }

    #[test]
    fn scenario_add_under_folder_then_cascade_delete() {
        let mut store = BookmarkStore::new();
        let f1 = store.add(&folder("F1", None)).unwrap();
        let l1 = store
            .add(&link("L1", Some("https://x.com"), Some(&f1.id)))
            .unwrap();

        let children = store.children(Some(&f1.id));
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, l1.id);

        let removed = store.remove(&f1.id).unwrap();
        assert_eq!(removed.len(), 2);
        assert!(store.get(&f1.id).is_none());
        assert!(store.get(&l1.id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn deleting_selected_node_clears_selection() {
        let mut store = BookmarkStore::new();
        let f = store.add(&folder("F", None)).unwrap();
        let l = store
            .add(&link("L", Some("https://x.com"), Some(&f.id)))
            .unwrap();

        store.select(Some(&l.id), false).unwrap();
        store.toggle_folder(&f.id);
        assert_eq!(store.selected_id(), Some(l.id.as_str()));

        store.remove(&f.id).unwrap();
        assert_eq!(store.selected_id(), None);
        assert!(store.expanded_folder_ids().is_empty());
    }

    #[test]
    fn move_reparents_and_rejects_cycles() {
        let mut store = BookmarkStore::new();
        let a = store.add(&folder("A", None)).unwrap();
        let b = store.add(&folder("B", Some(&a.id))).unwrap();
        let c = store.add(&folder("C", Some(&b.id))).unwrap();
        let l = store
            .add(&link("L", Some("https://x.com"), Some(&a.id)))
            .unwrap();

        // Moving a leaf is fine
        let moved = store.move_to(&l.id, Some(&c.id), None).unwrap();
        assert_eq!(moved.parent_id.as_deref(), Some(c.id.as_str()));
        assert!(moved.updated_at > l.updated_at);

        // A under its own grandchild is a cycle
        let err = store.move_to(&a.id, Some(&c.id), None).unwrap_err();
        assert!(matches!(err, StoreError::Cycle(_)));

        // A node under itself is a cycle
        let err = store.move_to(&b.id, Some(&b.id), None).unwrap_err();
        assert!(matches!(err, StoreError::Cycle(_)));

        // Unknown ids are not found
        let err = store.move_to("missing", Some(&a.id), None).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
        let err = store.move_to(&b.id, Some("missing"), None).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));

        // A link cannot be the target parent
        let l2 = store.add(&link("L2", Some("https://y.com"), None)).unwrap();
        let err = store.move_to(&b.id, Some(&l2.id), None).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn move_to_root_and_explicit_order() {
        let mut store = BookmarkStore::new();
        let f = store.add(&folder("F", None)).unwrap();
        let l = store
            .add(&link("L", Some("https://x.com"), Some(&f.id)))
            .unwrap();

        let moved = store.move_to(&l.id, None, Some(5)).unwrap();
        assert_eq!(moved.parent_id, None);
        assert_eq!(moved.order_index, 5);
        assert_eq!(store.roots().len(), 2);
    }

    #[test]
    fn select_returns_switch_signal() {
        let mut store = BookmarkStore::new();
        let l = store.add(&link("L", Some("https://x.com"), None)).unwrap();

        let selection = store.select(Some(&l.id), true).unwrap();
        assert_eq!(selection.selected_id.as_deref(), Some(l.id.as_str()));
        assert!(selection.switch_to_detail);

        let selection = store.select(None, true).unwrap();
        assert_eq!(selection.selected_id, None);
        assert!(!selection.switch_to_detail);

        let err = store.select(Some("missing"), false).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn toggle_folder_flips_membership() {
        let mut store = BookmarkStore::new();
        let f = store.add(&folder("F", None)).unwrap();

        assert!(store.toggle_folder(&f.id));
        assert_eq!(store.expanded_folder_ids(), vec![f.id.clone()]);
        assert!(!store.toggle_folder(&f.id));
        assert!(store.expanded_folder_ids().is_empty());
    }

    #[test]
    fn tree_nests_children_in_order() {
        let mut store = BookmarkStore::new();
        let f = store.add(&folder("F", None)).unwrap();
        let a = store
            .add(&link("A", Some("https://a.com"), Some(&f.id)))
            .unwrap();
        let b = store
            .add(&link("B", Some("https://b.com"), Some(&f.id)))
            .unwrap();

        let tree = store.tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].bookmark.id, f.id);
        assert_eq!(
            tree[0]
                .children
                .iter()
                .map(|n| n.bookmark.id.as_str())
                .collect::<Vec<_>>(),
            vec![a.id.as_str(), b.id.as_str()]
        );

        let snapshot = store.snapshot();
        assert_eq!(
            snapshot.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
            vec![f.id.as_str(), a.id.as_str(), b.id.as_str()]
        );
    }

    /// Builds a random all-folder forest; each entry parents the next node
    /// to some already-created node.
    fn build_random_forest(
        store: &mut BookmarkStore,
        parent_picks: &[prop::sample::Index],
    ) -> Vec<String> {
        let root = store.add(&folder("f0", None)).unwrap();
        let mut ids = vec![root.id];
        for (i, pick) in parent_picks.iter().enumerate() {
            let parent = ids[pick.index(ids.len())].clone();
            let node = store
                .add(&folder(&format!("f{}", i + 1), Some(&parent)))
                .unwrap();
            ids.push(node.id);
        }
        ids
    }

    fn ancestor_chain(store: &BookmarkStore, id: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut cursor = store.get(id).and_then(|n| n.parent_id.clone());
        while let Some(current) = cursor {
            chain.push(current.clone());
            cursor = store.get(&current).and_then(|n| n.parent_id.clone());
        }
        chain
    }

    proptest! {
        #[test]
        fn moving_any_ancestor_under_a_descendant_is_a_cycle(
            parent_picks in prop::collection::vec(any::<prop::sample::Index>(), 1..24),
            target in any::<prop::sample::Index>(),
        ) {
            let mut store = BookmarkStore::new();
            let ids = build_random_forest(&mut store, &parent_picks);

            let b = ids[target.index(ids.len())].clone();
            for a in ancestor_chain(&store, &b) {
                let err = store.move_to(&a, Some(&b), None).unwrap_err();
                prop_assert!(matches!(err, StoreError::Cycle(_)));
            }
            let err = store.move_to(&b, Some(&b), None).unwrap_err();
            prop_assert!(matches!(err, StoreError::Cycle(_)));
        }

        #[test]
        fn cascade_delete_removes_exactly_the_subtree(
            parent_picks in prop::collection::vec(any::<prop::sample::Index>(), 1..24),
            target in any::<prop::sample::Index>(),
        ) {
            let mut store = BookmarkStore::new();
            let ids = build_random_forest(&mut store, &parent_picks);

            // Hang a link off every folder so the cascade crosses both kinds
            for (i, id) in ids.iter().enumerate() {
                store
                    .add(&link(&format!("l{}", i), Some("https://x.com"), Some(id)))
                    .unwrap();
            }

            let victim = ids[target.index(ids.len())].clone();
            let mut expected: HashSet<String> = store
                .descendant_ids(&victim)
                .into_iter()
                .collect();
            expected.insert(victim.clone());

            let before = store.len();
            let removed = store.remove(&victim).unwrap();
            let removed_ids: HashSet<String> =
                removed.iter().map(|b| b.id.clone()).collect();

            prop_assert_eq!(&removed_ids, &expected);
            prop_assert_eq!(store.len(), before - expected.len());
            for id in &expected {
                prop_assert!(store.get(id).is_none());
            }
        }
    }
}
