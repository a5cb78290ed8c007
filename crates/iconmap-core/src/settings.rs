use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IconMapError, Result};
use crate::pipeline::{Mode, SyncOptions};
use crate::reconcile::{MergeRules, DEFAULT_TARGET_PREFIX};

const SETTINGS_FILE: &str = "iconmap.toml";

/// Default settings template with rich comments
const DEFAULT_SETTINGS_TEMPLATE: &str = r#"# iconmap settings
# Relative paths are resolved against the directory holding this file.

[paths]
# Vendor icon tree: one subdirectory per category
official = "source/official"

# Hand-made icons, merged alongside the official ones (merge mode only)
# Set to "" to disable
manual = "source/manual"

# Catalog document to keep in sync
catalog = "scripts/Config.yaml"

[sync]
# merge: reconcile the existing catalog
# rebuild: regenerate it from the official tree
mode = "merge"

# Prefix for targets of services added in merge mode
target_prefix = "Azure"

# Only add services found in the category's own directory
scoped = false
"#;

/// Tool settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub paths: PathSettings,

    #[serde(default)]
    pub sync: SyncSettings,
}

/// Icon roots and catalog location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathSettings {
    #[serde(default = "default_official")]
    pub official: PathBuf,

    /// Empty disables the manual root
    #[serde(default = "default_manual")]
    pub manual: PathBuf,

    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
}

/// Merge/rebuild behavior
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncSettings {
    #[serde(default)]
    pub mode: Mode,

    #[serde(default = "default_target_prefix")]
    pub target_prefix: String,

    #[serde(default)]
    pub scoped: bool,
}

fn default_official() -> PathBuf {
    PathBuf::from("source/official")
}

fn default_manual() -> PathBuf {
    PathBuf::from("source/manual")
}

fn default_catalog() -> PathBuf {
    PathBuf::from("scripts/Config.yaml")
}

fn default_target_prefix() -> String {
    DEFAULT_TARGET_PREFIX.to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            official: default_official(),
            manual: default_manual(),
            catalog: default_catalog(),
        }
    }
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            target_prefix: default_target_prefix(),
            scoped: false,
        }
    }
}

impl Settings {
    /// Load settings from base directory
    pub fn load(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(SETTINGS_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let settings: Settings =
            toml::from_str(&content).map_err(|e| IconMapError::SettingsParse {
                path: path.clone(),
                message: e.to_string(),
            })?;

        Ok(settings)
    }

    /// Save settings to base directory
    pub fn save(&self, base_dir: &Path) -> Result<()> {
        let path = base_dir.join(SETTINGS_FILE);
        fs::create_dir_all(base_dir)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    /// Get settings file path
    pub fn path(base_dir: &Path) -> PathBuf {
        base_dir.join(SETTINGS_FILE)
    }

    /// Initialize settings with default template (rich comments)
    pub fn init(base_dir: &Path) -> Result<PathBuf> {
        let path = base_dir.join(SETTINGS_FILE);
        fs::create_dir_all(base_dir)?;

        if !path.exists() {
            fs::write(&path, DEFAULT_SETTINGS_TEMPLATE)?;
        }

        Ok(path)
    }

    /// Get a settings value by dot-notation key
    pub fn get(&self, key: &str) -> Option<String> {
        self.list()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set a settings value by dot-notation key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "paths.official" => self.paths.official = PathBuf::from(value.trim()),
            "paths.manual" => self.paths.manual = PathBuf::from(value.trim()),
            "paths.catalog" => self.paths.catalog = PathBuf::from(value.trim()),
            "sync.mode" => self.sync.mode = value.parse()?,
            "sync.target_prefix" => self.sync.target_prefix = value.trim().to_string(),
            "sync.scoped" => {
                self.sync.scoped = parse_bool(value).ok_or_else(|| {
                    IconMapError::InvalidSettingsValue {
                        key: key.to_string(),
                        value: value.to_string(),
                        reason: "expected true or false".to_string(),
                    }
                })?
            }
            _ => {
                return Err(IconMapError::SettingsKeyNotFound {
                    key: key.to_string(),
                })
            }
        }
        Ok(())
    }

    /// List all settings keys with their current values
    pub fn list(&self) -> Vec<(String, String)> {
        vec![
            (
                "paths.official".to_string(),
                self.paths.official.display().to_string(),
            ),
            (
                "paths.manual".to_string(),
                self.paths.manual.display().to_string(),
            ),
            (
                "paths.catalog".to_string(),
                self.paths.catalog.display().to_string(),
            ),
            ("sync.mode".to_string(), self.sync.mode.to_string()),
            (
                "sync.target_prefix".to_string(),
                self.sync.target_prefix.clone(),
            ),
            ("sync.scoped".to_string(), self.sync.scoped.to_string()),
        ]
    }

    /// Build run options, resolving relative paths against `base_dir`
    pub fn to_sync_options(&self, base_dir: &Path) -> SyncOptions {
        let manual = if self.paths.manual.as_os_str().is_empty() {
            None
        } else {
            Some(resolve_path(base_dir, &self.paths.manual))
        };

        SyncOptions {
            mode: self.sync.mode,
            official: resolve_path(base_dir, &self.paths.official),
            manual,
            catalog: resolve_path(base_dir, &self.paths.catalog),
            rules: MergeRules {
                target_prefix: self.sync.target_prefix.clone(),
                scoped: self.sync.scoped,
            },
            dry_run: false,
        }
    }
}

/// Join `path` onto `base_dir` unless it is already absolute
pub fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}
