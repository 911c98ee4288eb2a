use crate::{ConfigError, ConfigErrorResult, DEFAULT_DATABASE_FILENAME};

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

/// Where puppet records are stored
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file, relative to the config directory
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: String::from(DEFAULT_DATABASE_FILENAME),
        }
    }
}

impl DatabaseConfig {
    /// The database must stay inside the config directory.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let path = Path::new(&self.path);

        if self.path.trim().is_empty() {
            return Err(ConfigError::database("database.path is empty"));
        }

        let escapes = path
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ConfigError::database(
                "database.path must be relative and cannot contain '..'",
            ));
        }

        Ok(())
    }

    pub fn resolve(&self, config_dir: &Path) -> PathBuf {
        config_dir.join(&self.path)
    }
}
