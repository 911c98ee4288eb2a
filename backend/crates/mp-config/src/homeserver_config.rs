use crate::{
    ConfigError, ConfigErrorResult, DEFAULT_HOMESERVER_ADDRESS, DEFAULT_HOMESERVER_DOMAIN,
};

use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HomeserverConfig {
    /// Base URL used for client-server API calls
    pub address: String,
    /// Server name used in local identities (`@localpart:domain`)
    pub domain: String,
}

impl Default for HomeserverConfig {
    fn default() -> Self {
        Self {
            address: String::from(DEFAULT_HOMESERVER_ADDRESS),
            domain: String::from(DEFAULT_HOMESERVER_DOMAIN),
        }
    }
}

impl HomeserverConfig {
    pub fn validate(&self) -> ConfigErrorResult<()> {
        let address = Url::parse(&self.address).map_err(|e| {
            ConfigError::homeserver(format!(
                "homeserver.address must be a valid URL, got {:?}: {e}",
                self.address
            ))
        })?;

        if address.scheme() != "http" && address.scheme() != "https" {
            return Err(ConfigError::homeserver(format!(
                "homeserver.address must use http or https, got {}",
                address.scheme()
            )));
        }

        if self.domain.is_empty() || self.domain.contains(char::is_whitespace) {
            return Err(ConfigError::homeserver(format!(
                "homeserver.domain must be a non-empty server name, got {:?}",
                self.domain
            )));
        }

        Ok(())
    }
}
