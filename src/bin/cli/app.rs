use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use uuid::Uuid;

use glossa_lib::commands::vocabulary as commands;
use glossa_lib::commands::CommandError;
use glossa_lib::config::AppConfig;
use glossa_lib::vocabulary::VocabularyStore;

/// Shared application state for CLI commands
pub struct App {
    pub config: AppConfig,
    pub store: Arc<dyn VocabularyStore>,
}

impl App {
    /// Load the config and open the configured store
    pub fn new(config_path: Option<&Path>, data_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = AppConfig::load(config_path).context("Failed to load config")?;
        if data_dir.is_some() {
            config.data_dir = data_dir;
        }

        let store = config
            .open_store()
            .context("Failed to open vocabulary storage")?;

        Ok(Self { config, store })
    }

    pub fn store(&self) -> &dyn VocabularyStore {
        self.store.as_ref()
    }
}

/// Turn a boundary error into an anyhow error with its user-facing message
pub fn command_error(err: CommandError) -> anyhow::Error {
    anyhow!(err.message)
}

pub fn parse_id(id: &str) -> Result<Uuid> {
    commands::parse_entry_id(id).map_err(command_error)
}
