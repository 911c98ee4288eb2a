mod appservice_config;
mod bridge_config;
mod config;
mod database_config;
mod error;
mod homeserver_config;
mod log_level;
mod logging_config;

#[cfg(test)]
mod tests;

pub use appservice_config::AppserviceConfig;
pub use bridge_config::{BridgeConfig, DisplaynameParams, ProfileMetadataMode};
pub use config::Config;
pub use database_config::DatabaseConfig;
pub use error::{ConfigError, ConfigErrorResult};
pub use homeserver_config::HomeserverConfig;
pub use log_level::LogLevel;
pub use logging_config::LoggingConfig;

const DEFAULT_HOMESERVER_ADDRESS: &str = "http://localhost:8008";
const DEFAULT_HOMESERVER_DOMAIN: &str = "example.com";
const DEFAULT_USERNAME_TEMPLATE: &str = "meta_{userid}";
const DEFAULT_DISPLAYNAME_TEMPLATE: &str = "{displayname}";
const DEFAULT_DATABASE_FILENAME: &str = "puppets.db";
const DEFAULT_LOG_LEVEL: log::LevelFilter = log::LevelFilter::Info;
const DEFAULT_LOG_DIRECTORY: &str = "log";

pub const USERID_PLACEHOLDER: &str = "{userid}";
pub const DISPLAYNAME_PLACEHOLDER: &str = "{displayname}";
pub const USERNAME_PLACEHOLDER: &str = "{username}";
pub const UNKNOWN_USER_NAME: &str = "Unknown user";

pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
