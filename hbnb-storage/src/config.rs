//! Storage configuration, read from an optional `storage.toml`.
//!
//! ```toml
//! [storage]
//! file_path = "file.json"
//! pretty = false
//! reload_policy = "strict"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Store file used when nothing else is configured.
pub const DEFAULT_FILE_PATH: &str = "file.json";

/// What reload does with an entry it cannot rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReloadPolicy {
    #[default]
    /// Abort the whole reload; the registry is left unchanged.
    Strict,
    /// Skip the entry, log it, and keep loading the rest.
    Lenient,
}

/// Settings for a [`crate::FileStorage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_file_path")]
    pub file_path: PathBuf,
    /// Indent the store file.
    #[serde(default)]
    pub pretty: bool,
    #[serde(default)]
    pub reload_policy: ReloadPolicy,
}

fn default_file_path() -> PathBuf {
    PathBuf::from(DEFAULT_FILE_PATH)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            file_path: default_file_path(),
            pretty: false,
            reload_policy: ReloadPolicy::Strict,
        }
    }
}

/// Raw TOML structure matching the config file layout.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default)]
    storage: Option<StorageConfig>,
}

impl StorageConfig {
    /// Creates a config for an explicit store file, other settings default.
    pub fn for_path(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            ..Default::default()
        }
    }

    /// Parses a config document. A missing `[storage]` table means defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        let file: ConfigFile = toml::from_str(s)?;
        Ok(file.storage.unwrap_or_default())
    }

    /// Loads config from a path. Falls back to defaults with a warning if
    /// the file is unreadable or malformed.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No storage config at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!("Loaded storage config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!(
                        "Failed to parse storage config {:?}: {}. Using defaults.",
                        path, e
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read storage config {:?}: {}", path, e);
                Self::default()
            }
        }
    }
}
