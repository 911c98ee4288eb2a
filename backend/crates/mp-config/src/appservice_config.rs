use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS,
    MIN_REQUEST_TIMEOUT_SECS,
};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppserviceConfig {
    /// Token the bridge authenticates with when acting as its puppets
    pub as_token: String,
    /// Timeout applied to every outgoing HTTP request
    pub request_timeout_secs: u64,
}

impl Default for AppserviceConfig {
    fn default() -> Self {
        Self {
            as_token: String::new(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl AppserviceConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        if self.as_token.trim().is_empty() {
            return Err(ConfigError::appservice("appservice.as_token is required"));
        }

        if self.request_timeout_secs < MIN_REQUEST_TIMEOUT_SECS
            || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS
        {
            return Err(ConfigError::appservice(format!(
                "appservice.request_timeout_secs must be {}-{}, got {}",
                MIN_REQUEST_TIMEOUT_SECS, MAX_REQUEST_TIMEOUT_SECS, self.request_timeout_secs
            )));
        }

        Ok(())
    }
}
