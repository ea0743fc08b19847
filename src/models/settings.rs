//! User settings model: a closed, versioned configuration schema.
//!
//! Import rejects unknown keys outright instead of merging them, so a typo
//! in an imported file surfaces as a validation error rather than a silent
//! no-op.

use serde::{Deserialize, Serialize};

/// Current settings schema version. Bump when the field set changes shape.
pub const SETTINGS_SCHEMA_VERSION: i32 = 1;

/// Color theme preference.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
            Theme::System => "system",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            "system" => Some(Theme::System),
            _ => None,
        }
    }
}

/// Default bookmark listing layout.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DefaultView {
    Tree,
    Grid,
    List,
}

impl DefaultView {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefaultView::Tree => "tree",
            DefaultView::Grid => "grid",
            DefaultView::List => "list",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tree" => Some(DefaultView::Tree),
            "grid" => Some(DefaultView::Grid),
            "list" => Some(DefaultView::List),
            _ => None,
        }
    }
}

/// How often automatic backups run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BackupFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl BackupFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupFrequency::Daily => "daily",
            BackupFrequency::Weekly => "weekly",
            BackupFrequency::Monthly => "monthly",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "daily" => Some(BackupFrequency::Daily),
            "weekly" => Some(BackupFrequency::Weekly),
            "monthly" => Some(BackupFrequency::Monthly),
            _ => None,
        }
    }
}

/// The full user settings object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserSettings {
    #[serde(default = "default_schema_version")]
    pub schema_version: i32,
    pub theme: Theme,
    pub default_view: DefaultView,
    pub items_per_page: i64,
    pub auto_backup: bool,
    pub backup_frequency: BackupFrequency,
}

fn default_schema_version() -> i32 {
    SETTINGS_SCHEMA_VERSION
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            schema_version: SETTINGS_SCHEMA_VERSION,
            theme: Theme::System,
            default_view: DefaultView::Tree,
            items_per_page: 50,
            auto_backup: true,
            backup_frequency: BackupFrequency::Weekly,
        }
    }
}

impl UserSettings {
    /// Shallow-merge a patch: only fields present in the patch change.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(default_view) = patch.default_view {
            self.default_view = default_view;
        }
        if let Some(items_per_page) = patch.items_per_page {
            self.items_per_page = items_per_page;
        }
        if let Some(auto_backup) = patch.auto_backup {
            self.auto_backup = auto_backup;
        }
        if let Some(backup_frequency) = patch.backup_frequency {
            self.backup_frequency = backup_frequency;
        }
    }
}

/// Partial settings for update and import: every field optional, unknown
/// keys rejected.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsPatch {
    #[serde(default)]
    pub schema_version: Option<i32>,
    #[serde(default)]
    pub theme: Option<Theme>,
    #[serde(default)]
    pub default_view: Option<DefaultView>,
    #[serde(default)]
    pub items_per_page: Option<i64>,
    #[serde(default)]
    pub auto_backup: Option<bool>,
    #[serde(default)]
    pub backup_frequency: Option<BackupFrequency>,
}
