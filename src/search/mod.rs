//! Tantivy-based search index module.
//!
//! Provides full-text search capabilities for bookmarks with field boosting.

use std::path::Path;
use std::sync::Arc;
use tantivy::collector::TopDocs;
use tantivy::query::{BooleanQuery, BoostQuery, Occur, QueryParser};
use tantivy::schema::{Field, Schema, Value, STORED, TEXT};
use tantivy::{doc, Index, IndexReader, IndexWriter, ReloadPolicy, TantivyDocument};
use tokio::sync::RwLock;

use crate::errors::AppError;
use crate::models::Bookmark;

/// Field boost values matching frontend weights.
const BOOST_TITLE: f32 = 10.0;
const BOOST_DESCRIPTION: f32 = 7.0;
const BOOST_TAGS: f32 = 5.5;
const BOOST_URL: f32 = 4.0;

/// Search result with bookmark id and relevance score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub bookmark_id: String,
    pub score: f32,
}

/// Search index schema fields.
struct SearchFields {
    bookmark_id: Field,
    title: Field,
    description: Field,
    tags: Field,
    url: Field,
}

/// Tantivy search index for bookmarks.
pub struct SearchIndex {
    index: Index,
    reader: IndexReader,
    writer: Arc<RwLock<IndexWriter>>,
    fields: SearchFields,
}

impl SearchIndex {
    /// Create or open a search index at the specified path.
    pub fn open(index_path: &Path) -> Result<Self, AppError> {
        std::fs::create_dir_all(index_path)
            .map_err(|e| AppError::Search(format!("Failed to create index directory: {}", e)))?;

        // Define schema
        let mut schema_builder = Schema::builder();
        let bookmark_id = schema_builder.add_text_field("bookmark_id", STORED);
        let title = schema_builder.add_text_field("title", TEXT | STORED);
        let description = schema_builder.add_text_field("description", TEXT);
        let tags = schema_builder.add_text_field("tags", TEXT);
        let url = schema_builder.add_text_field("url", TEXT);
        let schema = schema_builder.build();

        let fields = SearchFields {
            bookmark_id,
            title,
            description,
            tags,
            url,
        };

        // Try to open existing index or create new one
        let index = Index::open_in_dir(index_path)
            .or_else(|_| Index::create_in_dir(index_path, schema.clone()))
            .map_err(|e| AppError::Search(format!("Failed to open/create index: {}", e)))?;

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::OnCommitWithDelay)
            .try_into()
            .map_err(|e| AppError::Search(format!("Failed to create reader: {}", e)))?;

        let writer = index
            .writer(50_000_000) // 50MB buffer
            .map_err(|e| AppError::Search(format!("Failed to create writer: {}", e)))?;

        Ok(Self {
            index,
            reader,
            writer: Arc::new(RwLock::new(writer)),
            fields,
        })
    }

    /// Rebuild the entire index from bookmarks.
    pub async fn rebuild(&self, bookmarks: &[Bookmark]) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        // Clear existing index
        writer.delete_all_documents()?;

        // Index all bookmarks
        for bookmark in bookmarks {
            let doc = self.create_document(bookmark);
            writer.add_document(doc)?;
        }

        writer.commit()?;

        // Reload reader to see new documents
        self.reader.reload()?;

        tracing::info!("Search index rebuilt with {} bookmarks", bookmarks.len());
        Ok(())
    }

    /// Index a single bookmark.
    pub async fn index_bookmark(&self, bookmark: &Bookmark) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        // Delete existing document if any
        let term = tantivy::Term::from_field_text(self.fields.bookmark_id, &bookmark.id);
        writer.delete_term(term);

        // Add new document
        let doc = self.create_document(bookmark);
        writer.add_document(doc)?;
        writer.commit()?;

        // Reload reader
        self.reader.reload()?;

        Ok(())
    }

    /// Remove a bookmark from the index.
    pub async fn remove_bookmark(&self, bookmark_id: &str) -> Result<(), AppError> {
        let mut writer = self.writer.write().await;

        let term = tantivy::Term::from_field_text(self.fields.bookmark_id, bookmark_id);
        writer.delete_term(term);
        writer.commit()?;

        self.reader.reload()?;

        Ok(())
    }

    /// Search for bookmarks matching the query.
    pub fn search(
        &self,
        query_str: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<SearchResult>, AppError> {
        if query_str.trim().is_empty() {
            return Ok(Vec::new());
        }

        let searcher = self.reader.searcher();

        // Create query parser for all searchable fields
        let query_parser = QueryParser::for_index(
            &self.index,
            vec![
                self.fields.title,
                self.fields.description,
                self.fields.tags,
                self.fields.url,
            ],
        );

        // Parse the user query
        let base_query = query_parser
            .parse_query(query_str)
            .map_err(|e| AppError::Search(format!("Invalid search query: {}", e)))?;

        // Create field-specific boosted queries
        let mut subqueries: Vec<(Occur, Box<dyn tantivy::query::Query>)> = Vec::new();

        // Parse query for each field with boost
        let field_queries = [
            (self.fields.title, BOOST_TITLE),
            (self.fields.description, BOOST_DESCRIPTION),
            (self.fields.tags, BOOST_TAGS),
            (self.fields.url, BOOST_URL),
        ];

        for (field, boost) in field_queries {
            let field_parser = QueryParser::for_index(&self.index, vec![field]);
            if let Ok(field_query) = field_parser.parse_query(query_str) {
                let boosted = BoostQuery::new(field_query, boost);
                subqueries.push((Occur::Should, Box::new(boosted)));
            }
        }

        // Combine with OR semantics
        let combined_query = if subqueries.is_empty() {
            base_query
        } else {
            Box::new(BooleanQuery::new(subqueries))
        };

        // Execute search with pagination
        let top_docs = searcher
            .search(&combined_query, &TopDocs::with_limit(limit + offset))
            .map_err(|e| AppError::Search(format!("Search failed: {}", e)))?;

        // Extract results with pagination
        let results: Vec<SearchResult> = top_docs
            .into_iter()
            .skip(offset)
            .take(limit)
            .filter_map(|(score, doc_address)| {
                let doc: TantivyDocument = searcher.doc(doc_address).ok()?;
                let bookmark_id = doc
                    .get_first(self.fields.bookmark_id)?
                    .as_str()?
                    .to_string();
                Some(SearchResult { bookmark_id, score })
            })
            .collect();

        Ok(results)
    }

    /// Create a Tantivy document from a bookmark.
    fn create_document(&self, bookmark: &Bookmark) -> TantivyDocument {
        let tags = bookmark
            .tags
            .as_ref()
            .map(|t| t.join(" "))
            .unwrap_or_default();

        doc!(
            self.fields.bookmark_id => bookmark.id.clone(),
            self.fields.title => bookmark.title.clone(),
            self.fields.description => bookmark.description.clone().unwrap_or_default(),
            self.fields.tags => tags,
            self.fields.url => bookmark.url.clone().unwrap_or_default()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BookmarkType;
    use tempfile::TempDir;

    fn create_test_bookmark(id: &str, title: &str, description: &str) -> Bookmark {
        Bookmark {
            id: id.to_string(),
            title: title.to_string(),
            url: Some("https://example.com".to_string()),
            icon: None,
            bookmark_type: BookmarkType::Link,
            parent_id: None,
            description: Some(description.to_string()),
            tags: None,
            order_index: 0,
            is_favorite: false,
            visit_count: 0,
            last_visited_at: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[tokio::test]
    async fn test_search_index_creation() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let bookmarks = vec![
            create_test_bookmark("1", "Rust Book", "The Rust programming language book"),
            create_test_bookmark("2", "Recipes", "Favorite cooking recipes"),
        ];

        index.rebuild(&bookmarks).await.unwrap();

        let results = index.search("rust", 10, 0).unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].bookmark_id, "1");
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let results = index.search("", 10, 0).unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_search_by_tag_text() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let mut bookmark = create_test_bookmark("1", "Homepage", "landing page");
        bookmark.tags = Some(vec!["reference".to_string(), "daily".to_string()]);
        index.rebuild(&[bookmark]).await.unwrap();

        let results = index.search("reference", 10, 0).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].bookmark_id, "1");
    }

    #[tokio::test]
    async fn test_removed_bookmark_disappears() {
        let temp_dir = TempDir::new().unwrap();
        let index = SearchIndex::open(temp_dir.path()).unwrap();

        let bookmarks = vec![create_test_bookmark("1", "Rust Book", "language book")];
        index.rebuild(&bookmarks).await.unwrap();
        index.remove_bookmark("1").await.unwrap();

        let results = index.search("rust", 10, 0).unwrap();
        assert!(results.is_empty());
    }
}
