use crate::{
    AppserviceConfig, BridgeConfig, ConfigError, ConfigErrorResult, DatabaseConfig,
    HomeserverConfig, LoggingConfig,
};

use std::path::PathBuf;

use log::info;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub homeserver: HomeserverConfig,
    pub appservice: AppserviceConfig,
    pub bridge: BridgeConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load config.
    ///
    /// Loading order:
    /// 1. Check for MP_CONFIG_DIR env var, else use ./.mp/
    /// 2. Auto-create config directory if it doesn't exist
    /// 3. Load config.toml if it exists, else use defaults
    /// 4. Apply MP_* environment variable overrides
    ///
    /// Does NOT validate - call validate() after load().
    pub fn load() -> ConfigErrorResult<Self> {
        let config_dir = Self::config_dir()?;

        if !config_dir.exists() {
            std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::Io {
                path: config_dir.clone(),
                source: e,
            })?;
        }

        let config_path = config_dir.join("config.toml");

        let mut config = if config_path.exists() {
            Self::load_toml(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env_overrides();

        Ok(config)
    }

    fn load_toml(path: &PathBuf) -> ConfigErrorResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::Toml {
            path: path.clone(),
            source: e,
        })
    }

    /// Get the config directory.
    /// Priority: MP_CONFIG_DIR env var > ./.mp/ (relative to cwd)
    pub fn config_dir() -> ConfigErrorResult<PathBuf> {
        if let Ok(dir) = std::env::var("MP_CONFIG_DIR") {
            return Ok(PathBuf::from(dir));
        }

        let cwd = std::env::current_dir()
            .map_err(|_| ConfigError::config("Cannot determine current working directory"))?;
        Ok(cwd.join(".mp"))
    }

    /// Validate all configuration.
    pub fn validate(&self) -> ConfigErrorResult<()> {
        self.homeserver.validate()?;
        self.appservice.validate()?;
        self.bridge.validate()?;
        self.database.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Get absolute path to database file.
    pub fn database_path(&self) -> ConfigErrorResult<PathBuf> {
        Ok(self.database.resolve(&Self::config_dir()?))
    }

    /// Get absolute path to the log file, if logging to a file.
    pub fn log_file_path(&self) -> ConfigErrorResult<Option<PathBuf>> {
        Ok(self.logging.file_path(&Self::config_dir()?))
    }

    /// Log configuration summary (never logs the appservice token).
    pub fn log_summary(&self) {
        info!("Configuration loaded:");
        info!(
            "  homeserver: {} (domain {})",
            self.homeserver.address, self.homeserver.domain
        );
        info!(
            "  appservice: token {}, timeout={}s",
            if self.appservice.as_token.is_empty() {
                "missing"
            } else {
                "set"
            },
            self.appservice.request_timeout_secs
        );
        info!(
            "  bridge: mode={}, username={}, displayname={}, profile_metadata={:?}",
            self.bridge.mode,
            self.bridge.username_template,
            self.bridge.displayname_template,
            self.bridge.profile_metadata
        );
        info!("  database: {}", self.database.path);
        info!(
            "  logging: {} to {} (colored: {})",
            self.logging.level,
            self.logging.file.as_deref().unwrap_or("console"),
            self.logging.colored
        );
    }

    fn apply_env_overrides(&mut self) {
        // Homeserver
        Self::apply_env_string("MP_HOMESERVER_ADDRESS", &mut self.homeserver.address);
        Self::apply_env_string("MP_HOMESERVER_DOMAIN", &mut self.homeserver.domain);

        // Appservice
        Self::apply_env_string("MP_AS_TOKEN", &mut self.appservice.as_token);
        Self::apply_env_parse(
            "MP_REQUEST_TIMEOUT_SECS",
            &mut self.appservice.request_timeout_secs,
        );

        // Bridge
        Self::apply_env_parse("MP_BRIDGE_MODE", &mut self.bridge.mode);
        Self::apply_env_string("MP_USERNAME_TEMPLATE", &mut self.bridge.username_template);
        Self::apply_env_string(
            "MP_DISPLAYNAME_TEMPLATE",
            &mut self.bridge.displayname_template,
        );
        Self::apply_env_parse("MP_PROFILE_METADATA", &mut self.bridge.profile_metadata);

        // Database
        Self::apply_env_string("MP_DATABASE_PATH", &mut self.database.path);

        // Logging
        Self::apply_env_parse("MP_LOG_LEVEL", &mut self.logging.level);
        Self::apply_env_bool("MP_LOG_COLORED", &mut self.logging.colored);
        Self::apply_env_option_string("MP_LOG_FILE", &mut self.logging.file);
    }

    fn apply_env_string(var_name: &str, target: &mut String) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val;
        }
    }

    /// Accepts "true"/"1"
    fn apply_env_bool(var_name: &str, target: &mut bool) {
        if let Ok(val) = std::env::var(var_name) {
            *target = val == "true" || val == "1";
        }
    }

    fn apply_env_parse<T: std::str::FromStr>(var_name: &str, target: &mut T) {
        if let Ok(val) = std::env::var(var_name)
            && let Ok(parsed) = val.parse()
        {
            *target = parsed;
        }
    }

    fn apply_env_option_string(var_name: &str, target: &mut Option<String>) {
        if let Ok(val) = std::env::var(var_name) {
            *target = Some(val);
        }
    }
}
