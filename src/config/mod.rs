//! Configuration module for the Favoritos backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Pre-shared key for API authentication (required in production)
    pub api_psk: Option<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Path to Tantivy search index directory
    pub index_path: PathBuf,
    /// Directory where backup snapshots are written
    pub backup_dir: PathBuf,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// User id that scopes all data rows for this deployment
    pub user_id: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_psk = env::var("FAVORITOS_API_PSK").ok();

        let db_path = env::var("FAVORITOS_DB_PATH")
            .unwrap_or_else(|_| "./data/app.sqlite".to_string())
            .into();

        let index_path = env::var("FAVORITOS_INDEX_PATH")
            .unwrap_or_else(|_| "./data/index".to_string())
            .into();

        let backup_dir = env::var("FAVORITOS_BACKUP_DIR")
            .unwrap_or_else(|_| "./data/backups".to_string())
            .into();

        let bind_addr = env::var("FAVORITOS_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .expect("Invalid FAVORITOS_BIND_ADDR format");

        let log_level = env::var("FAVORITOS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let user_id = env::var("FAVORITOS_USER_ID").unwrap_or_else(|_| "local".to_string());

        Self {
            api_psk,
            db_path,
            index_path,
            backup_dir,
            bind_addr,
            log_level,
            user_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        // Clear any existing env vars
        env::remove_var("FAVORITOS_API_PSK");
        env::remove_var("FAVORITOS_DB_PATH");
        env::remove_var("FAVORITOS_INDEX_PATH");
        env::remove_var("FAVORITOS_BACKUP_DIR");
        env::remove_var("FAVORITOS_BIND_ADDR");
        env::remove_var("FAVORITOS_LOG_LEVEL");
        env::remove_var("FAVORITOS_USER_ID");

        let config = Config::from_env();

        assert!(config.api_psk.is_none());
        assert_eq!(config.db_path, PathBuf::from("./data/app.sqlite"));
        assert_eq!(config.index_path, PathBuf::from("./data/index"));
        assert_eq!(config.backup_dir, PathBuf::from("./data/backups"));
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.user_id, "local");
    }
}
