mod config;
pub mod database;
mod memory;

pub use config::{Config, FormConfig, NotionConfig, NotionProperties};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::{ConfigError, Result};

/// Small keyed string store the tracker and the inputting flag persist into.
///
/// Last write wins; no schema versioning beyond the key names.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns whether a value was present.
    fn remove(&self, key: &str) -> Result<bool>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        (**self).remove(key)
    }
}

/// Returns `~/.config/timelog[-dev]/` based on TIMELOG_ENV.
///
/// Set TIMELOG_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if the home directory cannot be determined or if
/// creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?.join(".config");

    let env = std::env::var("TIMELOG_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("timelog-dev")
    } else {
        base_dir.join("timelog")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
