//! Mapping between remote account IDs and local puppet identities.
//!
//! A puppet identity looks like `@{localpart}:{domain}` where the localpart is
//! the configured username template with `{userid}` replaced by the decimal
//! remote ID. IDs are strictly positive and rendered without leading zeros,
//! which keeps the mapping collision-free in both directions.

use crate::{PuppetError, Result as PuppetErrorResult};

use mp_config::BridgeConfig;

use std::sync::OnceLock;

use log::error;
use regex::Regex;

#[derive(Debug)]
pub struct RemoteIdCodec {
    bridge: BridgeConfig,
    domain: String,
    /// Compiled on first parse; `None` if the pattern could not be built
    pattern: OnceLock<Option<Regex>>,
}

impl RemoteIdCodec {
    pub fn new(bridge: BridgeConfig, domain: impl Into<String>) -> Self {
        Self {
            bridge,
            domain: domain.into(),
            pattern: OnceLock::new(),
        }
    }

    #[track_caller]
    pub fn format(&self, remote_id: i64) -> PuppetErrorResult<String> {
        if remote_id <= 0 {
            return Err(PuppetError::invalid_argument(format!(
                "remote ID must be positive, got {remote_id}"
            )));
        }

        Ok(format!(
            "@{}:{}",
            self.bridge.format_username(&remote_id.to_string()),
            self.domain
        ))
    }

    /// Extract the remote ID from a puppet identity.
    ///
    /// Returns `None` for anything that [`format`](Self::format) could not
    /// have produced, including IDs that overflow an `i64`.
    pub fn parse(&self, identity: &str) -> Option<i64> {
        let pattern = self.pattern.get_or_init(|| self.compile()).as_ref()?;

        pattern
            .captures(identity)
            .and_then(|captures| captures.get(1))
            .and_then(|id| id.as_str().parse::<i64>().ok())
    }

    fn compile(&self) -> Option<Regex> {
        let (prefix, suffix) = self.bridge.username_affixes();
        let pattern = format!(
            "^@{}([1-9][0-9]*){}:{}$",
            regex::escape(prefix),
            regex::escape(suffix),
            regex::escape(&self.domain)
        );

        match Regex::new(&pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                error!("Failed to compile puppet identity pattern {pattern}: {e}");
                None
            }
        }
    }
}
