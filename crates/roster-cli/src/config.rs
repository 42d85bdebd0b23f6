//! User settings for the `roster` CLI.
//!
//! Settings are read from a TOML file in the platform config directory (or
//! the path given with `--config`). A missing or unreadable file yields the
//! defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use roster_model::{PageSize, SortSpec};
use serde::{Deserialize, Serialize};
use tracing::warn;

// =============================================================================
// ROOT SETTINGS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub display: DisplaySettings,
    pub uploads: UploadSettings,
    pub mail: MailSettings,
}

impl Settings {
    /// Load settings from the default path.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from a specific path, falling back to defaults.
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        toml::from_str(&content).unwrap_or_else(|error| {
            warn!(path = %path.display(), %error, "ignoring unreadable settings file");
            Self::default()
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create config directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(path, content).with_context(|| format!("write {}", path.display()))
    }

    pub fn config_path() -> PathBuf {
        project_dirs()
            .map(|dirs| dirs.config_dir().join("settings.toml"))
            .unwrap_or_else(|| PathBuf::from("roster.toml"))
    }

    /// Directory holding the JSON tables, one subdirectory per tenant.
    pub fn data_dir(&self) -> PathBuf {
        self.general.data_dir.clone().unwrap_or_else(|| {
            project_dirs()
                .map(|dirs| dirs.data_dir().join("tables"))
                .unwrap_or_else(|| PathBuf::from("roster-data"))
        })
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.uploads
            .storage_dir
            .clone()
            .unwrap_or_else(|| self.data_dir().join("uploads"))
    }

    pub fn outbox_path(&self) -> PathBuf {
        self.mail
            .outbox
            .clone()
            .unwrap_or_else(|| self.data_dir().join("outbox.jsonl"))
    }

    /// Configured default sort, ignored with a warning if it does not parse.
    pub fn default_sort(&self) -> Option<SortSpec> {
        let raw = self.display.sort.as_deref()?;
        match raw.parse() {
            Ok(sort) => Some(sort),
            Err(error) => {
                warn!(sort = raw, %error, "ignoring invalid default sort");
                None
            }
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "Roster", "roster")
}

// =============================================================================
// SECTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Tenant every command is scoped to.
    pub tenant: String,
    /// User recorded as the signed-in actor.
    pub user: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            tenant: "demo".to_string(),
            user: "admin".to_string(),
            data_dir: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub page_size: PageSize,
    /// Default sort for employee lists, e.g. `name` or `hire_date:desc`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MailSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outbox: Option<PathBuf>,
    /// Reply-to address on outgoing reminders.
    pub sender: String,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            outbox: None,
            sender: "hr@roster.local".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [general]
            tenant = "acme"

            [display]
            page_size = 20
            sort = "hire_date:desc"
            "#,
        )
        .unwrap();
        assert_eq!(settings.general.tenant, "acme");
        assert_eq!(settings.general.user, "admin");
        assert_eq!(settings.display.page_size, PageSize::Twenty);
        assert_eq!(settings.default_sort(), Some(SortSpec::descending("hire_date")));
        assert_eq!(settings.mail.sender, "hr@roster.local");
    }

    #[test]
    fn invalid_page_size_is_rejected() {
        let result: std::result::Result<Settings, _> = toml::from_str("[display]\npage_size = 7\n");
        assert!(result.is_err());
    }

    #[test]
    fn missing_or_broken_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Settings::load_from(&dir.path().join("absent.toml")), Settings::default());

        let broken = dir.path().join("broken.toml");
        std::fs::write(&broken, "[general\n").unwrap();
        assert_eq!(Settings::load_from(&broken), Settings::default());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.toml");
        let mut settings = Settings::default();
        settings.general.data_dir = Some(dir.path().join("tables"));
        settings.save_to(&path).unwrap();
        let loaded = Settings::load_from(&path);
        assert_eq!(loaded, settings);
        assert_eq!(loaded.storage_dir(), dir.path().join("tables/uploads"));
    }
}
