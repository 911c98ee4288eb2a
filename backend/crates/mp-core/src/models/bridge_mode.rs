//! Which Meta network the bridge is connected to.

use crate::{CoreError, Result as CoreErrorResult};

use std::panic::Location;
use std::str::FromStr;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BridgeMode {
    #[default]
    Instagram,
    Facebook,
    FacebookTor,
    Messenger,
}

impl BridgeMode {
    /// Convert to config string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Instagram => "instagram",
            Self::Facebook => "facebook",
            Self::FacebookTor => "facebook-tor",
            Self::Messenger => "messenger",
        }
    }

    pub fn is_instagram(&self) -> bool {
        matches!(self, Self::Instagram)
    }

    pub fn is_messenger(&self) -> bool {
        !self.is_instagram()
    }

    /// Network name published in profile metadata identifiers
    pub fn network_name(&self) -> &'static str {
        if self.is_instagram() {
            "instagram"
        } else {
            "facebook"
        }
    }

    /// Service name published in profile metadata
    pub fn service_name(&self) -> &'static str {
        if self.is_instagram() {
            "instagramgo"
        } else {
            "facebookgo"
        }
    }

    /// Referer sent along with avatar downloads
    pub fn avatar_referer(&self) -> &'static str {
        match self {
            Self::Instagram => "https://www.instagram.com/",
            Self::Facebook => "https://www.facebook.com/",
            Self::FacebookTor => {
                "https://www.facebookwkhpilnemxj7asaniu7vnjjbiltxjqhye3mhbshg7kx5tfyd.onion/"
            }
            Self::Messenger => "https://www.messenger.com/",
        }
    }
}

impl FromStr for BridgeMode {
    type Err = CoreError;

    #[track_caller]
    fn from_str(s: &str) -> CoreErrorResult<Self> {
        match s {
            "instagram" => Ok(Self::Instagram),
            "facebook" => Ok(Self::Facebook),
            "facebook-tor" => Ok(Self::FacebookTor),
            "messenger" => Ok(Self::Messenger),
            _ => Err(CoreError::InvalidBridgeMode {
                value: s.to_string(),
                location: ErrorLocation::from(Location::caller()),
            }),
        }
    }
}

impl std::fmt::Display for BridgeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
