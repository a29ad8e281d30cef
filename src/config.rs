//! Persisted application settings.
//!
//! Settings live in `config.toml` under the `.trainscope` root. Every field
//! has a serde default so configs written by older builds keep loading.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::app_dirs::{self, AppDirError};

/// Default filename used to store the app configuration.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Default epoch count offered in the training form.
pub const DEFAULT_EPOCHS: u32 = 5000;

/// Settings persisted between launches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Last dataset file picked by the user.
    #[serde(default)]
    pub dataset_path: Option<PathBuf>,
    /// Epoch count used for the next run.
    #[serde(default = "default_epochs")]
    pub epochs: u32,
    /// Explicit engine library path; `None` uses the default search.
    #[serde(default)]
    pub engine_library: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            epochs: DEFAULT_EPOCHS,
            engine_library: None,
        }
    }
}

fn default_epochs() -> u32 {
    DEFAULT_EPOCHS
}

/// Errors raised while loading or saving the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config directory could not be resolved or created.
    #[error(transparent)]
    Dir(#[from] AppDirError),
    /// The config file exists but could not be read.
    #[error("Failed to read config at {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The config file contents are not valid TOML for this schema.
    #[error("Failed to parse config at {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// TOML error.
        source: toml::de::Error,
    },
    /// The settings could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// The config file could not be written.
    #[error("Failed to write config at {path}: {source}")]
    Write {
        /// Config file path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
}

/// Path of the config file under the app root.
pub fn config_path() -> Result<PathBuf, ConfigError> {
    Ok(app_dirs::app_root_dir()?.join(CONFIG_FILE_NAME))
}

/// Load persisted settings, falling back to defaults when no file exists.
pub fn load_or_default() -> Result<AppConfig, ConfigError> {
    load_from(&config_path()?)
}

/// Persist the settings to the default location.
pub fn save(config: &AppConfig) -> Result<(), ConfigError> {
    save_to(&config_path()?, config)
}

fn load_from(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn save_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    let raw = toml::to_string_pretty(config)?;
    fs::write(path, raw).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let config = load_from(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert_eq!(config.epochs, DEFAULT_EPOCHS);
        assert!(config.dataset_path.is_none());
        assert!(config.engine_library.is_none());
    }

    #[test]
    fn settings_round_trip_through_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        let config = AppConfig {
            dataset_path: Some(PathBuf::from("/data/fruit.csv")),
            epochs: 750,
            engine_library: Some(PathBuf::from("/opt/engine/libtrainer_engine.so")),
        };
        save_to(&path, &config).unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.dataset_path, config.dataset_path);
        assert_eq!(loaded.epochs, 750);
        assert_eq!(loaded.engine_library, config.engine_library);
    }

    #[test]
    fn partial_file_fills_missing_fields_with_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "dataset_path = \"/data/fruit.csv\"\n").unwrap();

        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.dataset_path, Some(PathBuf::from("/data/fruit.csv")));
        assert_eq!(loaded.epochs, DEFAULT_EPOCHS);
    }
}
