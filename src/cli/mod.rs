//! CLI command implementations

pub mod init;
pub mod lessons;
pub mod play;
pub mod register;
pub mod report;

use anyhow::Result;
use std::path::{Path, PathBuf};

use bugdojo::config::Config;
use bugdojo::{Engine, EngineSettings, SqliteStore};

/// Global path overrides from the command line
pub struct Paths {
    pub config: Option<PathBuf>,
    pub db: Option<PathBuf>,
}

impl Paths {
    pub fn load_config(&self) -> Result<Config> {
        let work_dir = std::env::current_dir()?;
        Config::load(self.config.as_deref(), &work_dir)
    }

    pub fn database_path(&self, config: &Config) -> PathBuf {
        self.db
            .clone()
            .unwrap_or_else(|| config.database_path())
    }

    /// Open the configured database and wrap it in an engine
    pub fn open_engine(&self) -> Result<Engine<SqliteStore>> {
        let config = self.load_config()?;
        let store = open_store(&self.database_path(&config))?;
        Ok(Engine::new(store, EngineSettings::from(&config)))
    }
}

fn open_store(path: &Path) -> Result<SqliteStore> {
    tracing::debug!(path = %path.display(), "opening database");
    SqliteStore::open(path)
}
