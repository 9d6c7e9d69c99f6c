//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - The Notion database id and the property names of its columns
//! - Form defaults (task minutes, how many recent records to show)
//! - The classifier's quiet period
//!
//! Configuration is stored at `~/.config/timelog/config.toml`.
//! The Notion token is a credential and lives in the OS keyring instead.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};

/// Column names of the user's Notion database.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotionProperties {
    #[serde(default = "default_title_property")]
    pub title: String,
    #[serde(default = "default_time_property")]
    pub time: String,
    #[serde(default = "default_reflection_property")]
    pub reflection: String,
    #[serde(default = "default_effectivity_property")]
    pub effectivity: String,
    #[serde(default = "default_waste_time_category_property")]
    pub waste_time_category: String,
    #[serde(default = "default_activity_category_property")]
    pub activity_category: String,
    #[serde(default = "default_expected_work_time_property")]
    pub expected_work_time: String,
    #[serde(default = "default_tension_property")]
    pub tension: String,
}

/// Notion connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotionConfig {
    #[serde(default)]
    pub database_id: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub properties: NotionProperties,
}

/// Record form defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default = "default_task_minutes")]
    pub default_minutes: u32,
    #[serde(default = "default_recent_page_size")]
    pub recent_page_size: u32,
    #[serde(default = "default_debounce_ms")]
    pub classify_debounce_ms: u64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/timelog/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub notion: NotionConfig,
    #[serde(default)]
    pub form: FormConfig,
}

fn default_title_property() -> String {
    "Name".into()
}
fn default_time_property() -> String {
    "Date".into()
}
fn default_reflection_property() -> String {
    "Reflection".into()
}
fn default_effectivity_property() -> String {
    "Effectivity".into()
}
fn default_waste_time_category_property() -> String {
    "WasteTimeCategory".into()
}
fn default_activity_category_property() -> String {
    "Category".into()
}
fn default_expected_work_time_property() -> String {
    "ExpectedWorkTime".into()
}
fn default_tension_property() -> String {
    "Tension".into()
}
fn default_base_url() -> String {
    "https://api.notion.com/v1".into()
}
fn default_task_minutes() -> u32 {
    30
}
fn default_recent_page_size() -> u32 {
    5
}
fn default_debounce_ms() -> u64 {
    300
}

impl Default for NotionProperties {
    fn default() -> Self {
        Self {
            title: default_title_property(),
            time: default_time_property(),
            reflection: default_reflection_property(),
            effectivity: default_effectivity_property(),
            waste_time_category: default_waste_time_category_property(),
            activity_category: default_activity_category_property(),
            expected_work_time: default_expected_work_time_property(),
            tension: default_tension_property(),
        }
    }
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            database_id: String::new(),
            base_url: default_base_url(),
            properties: NotionProperties::default(),
        }
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            default_minutes: default_task_minutes(),
            recent_page_size: default_recent_page_size(),
            classify_debounce_ms: default_debounce_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot overwrite a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
                .into()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value in memory by dot-separated key. Unknown keys and
    /// values of the wrong type are rejected.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        Ok(())
    }

    /// Set a value by key and persist.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Database id, or an error naming the key to set.
    pub fn database_id(&self) -> Result<&str> {
        if self.notion.database_id.is_empty() {
            return Err(ConfigError::MissingKey("notion.database_id".into()).into());
        }
        Ok(&self.notion.database_id)
    }
}
