//! Application configuration
//!
//! Read from `config.toml` (default: `~/.config/glossa/config.toml`). Every
//! key is optional; a missing file means all defaults.
//!
//! ```toml
//! dataDir = "/home/me/.local/share/glossa"
//! storage = "file"
//!
//! [server]
//! bind = "127.0.0.1:7878"
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vocabulary::{
    FileVocabularyStore, MemoryVocabularyStore, VocabularyStorageError, VocabularyStore,
};

const APP_NAME: &str = "glossa";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Data directory not found")]
    DataDirNotFound,

    #[error("Storage error: {0}")]
    Storage(#[from] VocabularyStorageError),
}

/// Which backend holds the vocabulary entries
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON file per entry under the data directory
    #[default]
    File,
    /// Process memory only, lost on exit
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Address the REST server listens on
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "127.0.0.1:7878".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    /// Where entries are stored (default: platform local data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub storage: StorageBackend,
    #[serde(default)]
    pub server: ServerConfig,
}

impl AppConfig {
    /// Default location of the config file
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_NAME).join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing file yields the defaults; an unparsable one is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(p) => p,
            None => return Ok(Self::default()),
        };

        if !path.exists() {
            log::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)?;
        let config = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Configured data directory, falling back to the platform default
    pub fn resolve_data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|p| p.join(APP_NAME))
                .ok_or(ConfigError::DataDirNotFound),
        }
    }

    /// Build the configured storage backend
    pub fn open_store(&self) -> Result<Arc<dyn VocabularyStore>, ConfigError> {
        match self.storage {
            StorageBackend::Memory => Ok(Arc::new(MemoryVocabularyStore::new())),
            StorageBackend::File => {
                let data_dir = self.resolve_data_dir()?;
                log::info!("Using vocabulary data in {:?}", data_dir);
                Ok(Arc::new(FileVocabularyStore::new(data_dir)?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.server.bind, "127.0.0.1:7878");
    }

    #[test]
    fn test_parse_full_config() {
        let config = AppConfig::from_toml(
            r#"
            dataDir = "/tmp/glossa"
            storage = "memory"

            [server]
            bind = "0.0.0.0:9000"
            "#,
        )
        .unwrap();

        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/glossa")));
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load(Some(&temp.path().join("nope.toml"))).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "storage = [").unwrap();

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_open_file_store_in_data_dir() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig {
            data_dir: Some(temp.path().to_path_buf()),
            ..Default::default()
        };

        let store = config.open_store().unwrap();
        store
            .insert_entry(crate::vocabulary::NewEntry::new("Haus", "de"))
            .unwrap();

        assert!(temp.path().join("vocabulary").join("entries").is_dir());
        assert_eq!(store.list_entries().unwrap().len(), 1);
    }
}
