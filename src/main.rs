//! Favoritos Backend
//!
//! A production-grade REST backend for a hierarchical bookmark manager,
//! with SQLite persistence and Tantivy full-text search. The in-memory
//! bookmark store is the tree authority; handlers write through to the
//! database and search index after each successful store mutation.

mod api;
mod auth;
mod config;
mod db;
mod errors;
mod models;
mod search;
mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::Repository;
use search::SearchIndex;
use store::BookmarkStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<BookmarkStore>>,
    pub repo: Arc<Repository>,
    pub search: Arc<SearchIndex>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Favoritos Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Index path: {:?}", config.index_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (FAVORITOS_API_PSK). Authentication is disabled!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    // Hydrate the in-memory store from the database
    let rows = repo.list_bookmarks(&config.user_id).await?;
    tracing::info!("Loaded {} bookmarks", rows.len());
    let store = Arc::new(RwLock::new(BookmarkStore::from_rows(rows)));

    // Initialize search index
    let search = Arc::new(SearchIndex::open(&config.index_path)?);

    // Build initial search index from the store
    tracing::info!("Building search index...");
    let snapshot = store.read().await.snapshot();
    search.rebuild(&snapshot).await?;
    tracing::info!("Search index built with {} bookmarks", snapshot.len());

    // Create application state
    let state = AppState {
        store,
        repo,
        search,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();

    // API routes
    let api_routes = Router::new()
        // Bookmarks
        .route("/bookmarks", get(api::list_bookmarks))
        .route("/bookmarks", post(api::create_bookmark))
        .route("/bookmarks/tree", get(api::get_bookmark_tree))
        .route("/bookmarks/{id}", get(api::get_bookmark))
        .route("/bookmarks/{id}", put(api::update_bookmark))
        .route("/bookmarks/{id}", delete(api::delete_bookmark))
        .route("/bookmarks/{id}/move", put(api::move_bookmark))
        .route("/bookmarks/{id}/visit", post(api::visit_bookmark))
        .route("/bookmarks/{id}/tags", get(api::list_bookmark_tags))
        .route("/bookmarks/{id}/tags", post(api::assign_tag))
        .route("/bookmarks/{id}/tags/{tag_id}", delete(api::unassign_tag))
        // Tags
        .route("/tags", get(api::list_tags))
        .route("/tags", post(api::create_tag))
        .route("/tags/{id}", put(api::update_tag))
        .route("/tags/{id}", delete(api::delete_tag))
        // Search
        .route("/search", get(api::search_bookmarks))
        // Settings
        .route("/settings", get(api::get_settings))
        .route("/settings", put(api::update_settings))
        .route("/settings/export", get(api::export_settings))
        .route("/settings/import", post(api::import_settings))
        // Profile
        .route("/profile", get(api::get_profile))
        .route("/profile", put(api::update_profile))
        // Backups
        .route("/backups", get(api::list_backups))
        .route("/backups", post(api::create_backup))
        // Stats and audit trail
        .route("/stats", get(api::get_stats))
        .route("/audit", get(api::list_audit))
        // UI state
        .route("/ui/state", get(api::get_ui_state))
        .route("/ui/selection", put(api::set_selection))
        .route("/ui/folders/{id}/toggle", post(api::toggle_folder))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
