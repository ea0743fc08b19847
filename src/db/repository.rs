//! Database repository for CRUD operations.
//!
//! Uses prepared statements and transactions for data integrity. Bookmark
//! rows are written through from the in-memory store, which is the tree
//! authority; everything else is owned here.

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use std::collections::HashMap;

use crate::errors::AppError;
use crate::models::{
    AuditEntry, Backup, Bookmark, BookmarkType, CreateTagRequest, Profile, Tag,
    UpdateProfileRequest, UpdateTagRequest, UserSettings, UserStats,
};

/// Database repository for all data operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    // ==================== BOOKMARK OPERATIONS ====================

    /// List all bookmark rows for a user. Ordering is left to the store.
    pub async fn list_bookmarks(&self, user_id: &str) -> Result<Vec<Bookmark>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, title, url, icon, type, parent_id, description, tags,
                      order_index, is_favorite, visit_count, last_visited_at,
                      created_at, updated_at
               FROM bookmarks WHERE user_id = ?"#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(bookmark_from_row).collect()
    }

    /// Persist a freshly created bookmark node.
    pub async fn insert_bookmark(&self, user_id: &str, b: &Bookmark) -> Result<(), AppError> {
        let tags_json = b
            .tags
            .as_ref()
            .map(|t| serde_json::to_string(t).unwrap_or_default());

        sqlx::query(
            r#"INSERT INTO bookmarks (
                id, user_id, title, url, icon, type, parent_id, description, tags,
                order_index, is_favorite, visit_count, last_visited_at, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&b.id)
        .bind(user_id)
        .bind(&b.title)
        .bind(&b.url)
        .bind(&b.icon)
        .bind(b.bookmark_type.as_str())
        .bind(&b.parent_id)
        .bind(&b.description)
        .bind(&tags_json)
        .bind(b.order_index)
        .bind(b.is_favorite as i32)
        .bind(b.visit_count)
        .bind(&b.last_visited_at)
        .bind(&b.created_at)
        .bind(&b.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Write a mutated bookmark node back to its row.
    pub async fn update_bookmark(&self, user_id: &str, b: &Bookmark) -> Result<(), AppError> {
        let tags_json = b
            .tags
            .as_ref()
            .map(|t| serde_json::to_string(t).unwrap_or_default());

        let result = sqlx::query(
            r#"UPDATE bookmarks SET
                title = ?, url = ?, icon = ?, parent_id = ?, description = ?, tags = ?,
                order_index = ?, is_favorite = ?, visit_count = ?, last_visited_at = ?,
                updated_at = ?
            WHERE id = ? AND user_id = ?"#,
        )
        .bind(&b.title)
        .bind(&b.url)
        .bind(&b.icon)
        .bind(&b.parent_id)
        .bind(&b.description)
        .bind(&tags_json)
        .bind(b.order_index)
        .bind(b.is_favorite as i32)
        .bind(b.visit_count)
        .bind(&b.last_visited_at)
        .bind(&b.updated_at)
        .bind(&b.id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Bookmark {} not found", b.id)));
        }
        Ok(())
    }

    /// Delete the given bookmark rows in one transaction.
    ///
    /// The store has already computed the cascade set; the schema's
    /// ON DELETE CASCADE foreign key may have removed some rows before we
    /// reach them, so affected counts are not checked.
    pub async fn delete_bookmarks(&self, user_id: &str, ids: &[String]) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        for id in ids {
            sqlx::query("DELETE FROM bookmarks WHERE id = ? AND user_id = ?")
                .bind(id)
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // ==================== TAG OPERATIONS ====================

    /// List all tags.
    pub async fn list_tags(&self) -> Result<Vec<Tag>, AppError> {
        let rows = sqlx::query(
            "SELECT id, name, color, description, created_by, is_shared, created_at \
             FROM tags ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(tag_from_row).collect())
    }

    /// Get a tag by ID.
    pub async fn get_tag(&self, id: &str) -> Result<Option<Tag>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, color, description, created_by, is_shared, created_at \
             FROM tags WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(tag_from_row))
    }

    /// Create a new tag.
    pub async fn create_tag(&self, request: &CreateTagRequest) -> Result<Tag, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO tags (id, name, color, description, created_by, is_shared, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&request.name)
        .bind(&request.color)
        .bind(&request.description)
        .bind(&request.created_by)
        .bind(request.is_shared as i32)
        .bind(&now)
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if let sqlx::Error::Database(db) = &err {
                if db.is_unique_violation() {
                    return AppError::Validation(format!(
                        "Tag name '{}' already exists",
                        request.name
                    ));
                }
            }
            AppError::from(err)
        })?;

        Ok(Tag {
            id,
            name: request.name.clone(),
            color: request.color.clone(),
            description: request.description.clone(),
            created_by: request.created_by.clone(),
            is_shared: request.is_shared,
            created_at: now,
        })
    }

    /// Update a tag.
    pub async fn update_tag(&self, id: &str, request: &UpdateTagRequest) -> Result<Tag, AppError> {
        let existing = self
            .get_tag(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", id)))?;

        let name = request.name.as_ref().unwrap_or(&existing.name);
        let color = request.color.clone().or(existing.color.clone());
        let description = request.description.clone().or(existing.description.clone());
        let is_shared = request.is_shared.unwrap_or(existing.is_shared);

        let result = sqlx::query(
            "UPDATE tags SET name = ?, color = ?, description = ?, is_shared = ? WHERE id = ?",
        )
        .bind(name)
        .bind(&color)
        .bind(&description)
        .bind(is_shared as i32)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tag {} not found", id)));
        }

        Ok(Tag {
            id: id.to_string(),
            name: name.clone(),
            color,
            description,
            created_by: existing.created_by,
            is_shared,
            created_at: existing.created_at,
        })
    }

    /// Delete a tag. Join rows go with it via the cascade.
    pub async fn delete_tag(&self, id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Tag {} not found", id)));
        }
        Ok(())
    }

    // ==================== BOOKMARK-TAG OPERATIONS ====================

    /// Link a managed tag to a bookmark.
    pub async fn assign_tag(&self, bookmark_id: &str, tag_id: &str) -> Result<(), AppError> {
        self.get_tag(tag_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Tag {} not found", tag_id)))?;

        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            "INSERT OR IGNORE INTO bookmark_tags (id, bookmark_id, tag_id, created_at) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(bookmark_id)
        .bind(tag_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::Validation(format!(
                "Tag {} is already assigned to bookmark {}",
                tag_id, bookmark_id
            )));
        }
        Ok(())
    }

    /// Unlink a managed tag from a bookmark.
    pub async fn unassign_tag(&self, bookmark_id: &str, tag_id: &str) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM bookmark_tags WHERE bookmark_id = ? AND tag_id = ?")
            .bind(bookmark_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Tag {} is not assigned to bookmark {}",
                tag_id, bookmark_id
            )));
        }
        Ok(())
    }

    /// Managed tags linked to a bookmark.
    pub async fn list_bookmark_tags(&self, bookmark_id: &str) -> Result<Vec<Tag>, AppError> {
        let rows = sqlx::query(
            r#"SELECT t.id, t.name, t.color, t.description, t.created_by, t.is_shared, t.created_at
               FROM tags t
               JOIN bookmark_tags bt ON bt.tag_id = t.id
               WHERE bt.bookmark_id = ?
               ORDER BY t.name"#,
        )
        .bind(bookmark_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(tag_from_row).collect())
    }

    // ==================== SETTINGS OPERATIONS ====================

    /// Get the user's settings, if any have been stored.
    pub async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>, AppError> {
        let row = sqlx::query(
            "SELECT theme, default_view, items_per_page, auto_backup, backup_frequency \
             FROM user_settings WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(settings_from_row))
    }

    /// Insert or update the user's settings row.
    pub async fn upsert_settings(
        &self,
        user_id: &str,
        settings: &UserSettings,
    ) -> Result<(), AppError> {
        let now = Utc::now().to_rfc3339();
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query(
            r#"INSERT INTO user_settings
                (id, user_id, theme, default_view, items_per_page, auto_backup,
                 backup_frequency, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                theme = excluded.theme,
                default_view = excluded.default_view,
                items_per_page = excluded.items_per_page,
                auto_backup = excluded.auto_backup,
                backup_frequency = excluded.backup_frequency,
                updated_at = excluded.updated_at"#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(settings.theme.as_str())
        .bind(settings.default_view.as_str())
        .bind(settings.items_per_page)
        .bind(settings.auto_backup as i32)
        .bind(settings.backup_frequency.as_str())
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== PROFILE OPERATIONS ====================

    /// Get the user's profile.
    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, AppError> {
        let row = sqlx::query(
            "SELECT id, name, avatar_url, created_at, updated_at FROM profiles WHERE id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(profile_from_row))
    }

    /// Insert or update the user's profile.
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        request: &UpdateProfileRequest,
    ) -> Result<Profile, AppError> {
        let existing = self.get_profile(user_id).await?;
        let now = Utc::now().to_rfc3339();

        let (name, avatar_url, created_at) = match &existing {
            Some(profile) => (
                request.name.clone().or(profile.name.clone()),
                request.avatar_url.clone().or(profile.avatar_url.clone()),
                profile.created_at.clone(),
            ),
            None => (request.name.clone(), request.avatar_url.clone(), now.clone()),
        };

        sqlx::query(
            r#"INSERT INTO profiles (id, name, avatar_url, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO UPDATE SET
                name = excluded.name,
                avatar_url = excluded.avatar_url,
                updated_at = excluded.updated_at"#,
        )
        .bind(user_id)
        .bind(&name)
        .bind(&avatar_url)
        .bind(&created_at)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(Profile {
            id: user_id.to_string(),
            name,
            avatar_url,
            created_at,
            updated_at: now,
        })
    }

    // ==================== BACKUP OPERATIONS ====================

    /// List backup records, newest first.
    pub async fn list_backups(&self, user_id: &str) -> Result<Vec<Backup>, AppError> {
        let rows = sqlx::query(
            "SELECT id, filename, file_size, backup_type, status, created_at \
             FROM backups WHERE user_id = ? ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(backup_from_row).collect())
    }

    /// Record a backup attempt.
    pub async fn insert_backup(&self, user_id: &str, backup: &Backup) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO backups (id, user_id, filename, file_size, backup_type, status, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&backup.id)
        .bind(user_id)
        .bind(&backup.filename)
        .bind(backup.file_size)
        .bind(&backup.backup_type)
        .bind(&backup.status)
        .bind(&backup.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    // ==================== AUDIT OPERATIONS ====================

    /// Append an audit trail entry.
    pub async fn append_audit(
        &self,
        user_id: &str,
        action: &str,
        target_table: &str,
        target_id: Option<&str>,
        old_values: Option<serde_json::Value>,
        new_values: Option<serde_json::Value>,
    ) -> Result<(), AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let old_json = old_values.map(|v| v.to_string());
        let new_json = new_values.map(|v| v.to_string());

        sqlx::query(
            r#"INSERT INTO audit_log
                (id, user_id, action, target_table, target_id, old_values, new_values, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(user_id)
        .bind(action)
        .bind(target_table)
        .bind(target_id)
        .bind(&old_json)
        .bind(&new_json)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Most recent audit entries, newest first.
    pub async fn list_audit(&self, user_id: &str, limit: i64) -> Result<Vec<AuditEntry>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, action, target_table, target_id, old_values, new_values, created_at
               FROM audit_log WHERE user_id = ?
               ORDER BY created_at DESC, id DESC LIMIT ?"#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(audit_from_row).collect())
    }

    // ==================== STATS OPERATIONS ====================

    /// Aggregate counts over the user's collection.
    pub async fn get_user_stats(&self, user_id: &str) -> Result<UserStats, AppError> {
        let row = sqlx::query(
            r#"SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN type = 'folder' THEN 1 ELSE 0 END), 0) AS folders,
                COALESCE(SUM(CASE WHEN type = 'link' THEN 1 ELSE 0 END), 0) AS links
               FROM bookmarks WHERE user_id = ?"#,
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        let total_bookmarks: i64 = row.get("total");
        let total_folders: i64 = row.get("folders");
        let total_links: i64 = row.get("links");

        let tag_row = sqlx::query("SELECT COUNT(*) AS total FROM tags")
            .fetch_one(&self.pool)
            .await?;
        let total_tags: i64 = tag_row.get("total");

        // Free-text labels live as JSON arrays in a TEXT column; count them here
        let label_rows =
            sqlx::query("SELECT tags FROM bookmarks WHERE user_id = ? AND tags IS NOT NULL")
                .bind(user_id)
                .fetch_all(&self.pool)
                .await?;

        let mut counts: HashMap<String, usize> = HashMap::new();
        for row in &label_rows {
            let raw: Option<String> = row.get("tags");
            if let Some(raw) = raw {
                for label in parse_json_array(&raw) {
                    *counts.entry(label).or_insert(0) += 1;
                }
            }
        }
        let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let most_used_tags = ranked.into_iter().take(5).map(|(label, _)| label).collect();

        Ok(UserStats {
            total_bookmarks,
            total_folders,
            total_links,
            total_tags,
            most_used_tags,
        })
    }
}

// Helper functions for row conversion

fn bookmark_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Bookmark, AppError> {
    let type_str: String = row.get("type");
    let bookmark_type = BookmarkType::from_str(&type_str)
        .ok_or_else(|| AppError::Database(format!("Unknown bookmark type '{}'", type_str)))?;
    let is_favorite: i32 = row.get("is_favorite");
    let tags_str: Option<String> = row.get("tags");

    Ok(Bookmark {
        id: row.get("id"),
        title: row.get("title"),
        url: row.get("url"),
        icon: row.get("icon"),
        bookmark_type,
        parent_id: row.get("parent_id"),
        description: row.get("description"),
        tags: tags_str.map(|s| parse_json_array(&s)),
        order_index: row.get("order_index"),
        is_favorite: is_favorite != 0,
        visit_count: row.get("visit_count"),
        last_visited_at: row.get("last_visited_at"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn tag_from_row(row: &sqlx::sqlite::SqliteRow) -> Tag {
    let is_shared: i32 = row.get("is_shared");
    Tag {
        id: row.get("id"),
        name: row.get("name"),
        color: row.get("color"),
        description: row.get("description"),
        created_by: row.get("created_by"),
        is_shared: is_shared != 0,
        created_at: row.get("created_at"),
    }
}

fn settings_from_row(row: &sqlx::sqlite::SqliteRow) -> UserSettings {
    use crate::models::{BackupFrequency, DefaultView, Theme};

    let theme_str: String = row.get("theme");
    let view_str: String = row.get("default_view");
    let frequency_str: String = row.get("backup_frequency");
    let auto_backup: i32 = row.get("auto_backup");
    let defaults = UserSettings::default();

    UserSettings {
        schema_version: defaults.schema_version,
        theme: Theme::from_str(&theme_str).unwrap_or(defaults.theme),
        default_view: DefaultView::from_str(&view_str).unwrap_or(defaults.default_view),
        items_per_page: row.get("items_per_page"),
        auto_backup: auto_backup != 0,
        backup_frequency: BackupFrequency::from_str(&frequency_str)
            .unwrap_or(defaults.backup_frequency),
    }
}

fn profile_from_row(row: &sqlx::sqlite::SqliteRow) -> Profile {
    Profile {
        id: row.get("id"),
        name: row.get("name"),
        avatar_url: row.get("avatar_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

fn backup_from_row(row: &sqlx::sqlite::SqliteRow) -> Backup {
    Backup {
        id: row.get("id"),
        filename: row.get("filename"),
        file_size: row.get("file_size"),
        backup_type: row.get("backup_type"),
        status: row.get("status"),
        created_at: row.get("created_at"),
    }
}

fn audit_from_row(row: &sqlx::sqlite::SqliteRow) -> AuditEntry {
    let old_str: Option<String> = row.get("old_values");
    let new_str: Option<String> = row.get("new_values");
    AuditEntry {
        id: row.get("id"),
        action: row.get("action"),
        target_table: row.get("target_table"),
        target_id: row.get("target_id"),
        old_values: old_str.and_then(|s| serde_json::from_str(&s).ok()),
        new_values: new_str.and_then(|s| serde_json::from_str(&s).ok()),
        created_at: row.get("created_at"),
    }
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}
