use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::storage::QUOTA_DB_FILENAME;

#[derive(Debug, Clone)]
pub struct StanzaConfig {
    pub database_path: PathBuf,
    pub log_level: String,
}

impl Default for StanzaConfig {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from(QUOTA_DB_FILENAME),
            log_level: "warn".to_string(),
        }
    }
}

impl StanzaConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(path) = env::var("QUOTA_DB_PATH") {
            cfg.database_path = PathBuf::from(path);
        }
        if let Ok(level) = env::var("LOG_LEVEL") {
            cfg.log_level = level;
        }

        cfg
    }

    /// Command line flags take precedence over the environment; the merged
    /// result is validated here.
    pub fn with_database(mut self, path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            self.database_path = path;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_path.as_os_str().is_empty() {
            anyhow::bail!("database path must not be empty");
        }
        if self.database_path.is_dir() {
            anyhow::bail!(
                "{} is a directory, expected a database file",
                self.database_path.display()
            );
        }
        EnvFilter::try_new(&self.log_level)
            .with_context(|| format!("LOG_LEVEL is invalid: {}", self.log_level))?;

        Ok(())
    }
}
