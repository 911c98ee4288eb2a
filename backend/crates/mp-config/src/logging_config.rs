use crate::{ConfigError, ConfigErrorResult, DEFAULT_LOG_DIRECTORY, LogLevel};

use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Colorize console output; ignored for file output
    pub colored: bool,
    /// File name inside `dir`. Unset logs to the console.
    pub file: Option<String>,
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            colored: true,
            file: None,
            dir: String::from(DEFAULT_LOG_DIRECTORY),
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if let Some(file) = &self.file
            && (file.is_empty() || file.contains(['/', '\\']))
        {
            return Err(ConfigError::config(format!(
                "logging.file must be a plain file name, got {file:?}"
            )));
        }

        Ok(())
    }

    /// Full log file path under `config_dir`, if logging to a file
    pub fn file_path(&self, config_dir: &Path) -> Option<PathBuf> {
        self.file
            .as_ref()
            .map(|file| config_dir.join(&self.dir).join(file))
    }
}
