//! Command implementations. Each returns the text to print on stdout.

use crate::conversations::DetachedConversations;
use crate::error::{BridgeError, Result as BridgeErrorResult};

use mp_config::{Config, ProfileMetadataMode};
use mp_core::ProfileSnapshot;
use mp_db::{PuppetRepository, open_pool};
use mp_puppet::{
    HomeserverClient, HttpAvatarSource, PuppetRegistry, PuppetServices, RemoteIdCodec,
};

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

/// Everything a command needs to touch puppets.
pub struct Bridge {
    registry: PuppetRegistry,
    repository: PuppetRepository,
    homeserver: Arc<HomeserverClient>,
    profile_metadata: ProfileMetadataMode,
}

impl Bridge {
    /// Open the database (running migrations) and wire the registry to the
    /// configured homeserver.
    pub async fn start(config: &Config) -> BridgeErrorResult<Self> {
        let database_path = config.database_path()?;
        info!("Opening database: {}", database_path.display());
        let repository = PuppetRepository::new(open_pool(&database_path).await?);

        let timeout = Duration::from_secs(config.appservice.request_timeout_secs);
        let homeserver = Arc::new(HomeserverClient::new(
            &config.homeserver.address,
            &config.appservice.as_token,
            timeout,
        )?);

        let services = PuppetServices {
            store: Arc::new(repository.clone()),
            profile_writer: homeserver.clone(),
            avatar_source: Arc::new(HttpAvatarSource::new(config.bridge.mode, timeout)?),
            conversations: Arc::new(DetachedConversations),
        };

        let registry = PuppetRegistry::new(
            config.bridge.clone(),
            config.homeserver.domain.clone(),
            services,
        );

        Ok(Self {
            registry,
            repository,
            homeserver,
            profile_metadata: config.bridge.profile_metadata,
        })
    }

    /// Resolve `profile_metadata = auto` against the homeserver. A failed
    /// probe leaves metadata publishing off.
    pub async fn probe_capabilities(&self) {
        if self.profile_metadata != ProfileMetadataMode::Auto {
            return;
        }

        match self.homeserver.supports_profile_metadata().await {
            Ok(supported) => {
                info!("Homeserver profile metadata support: {supported}");
                self.registry.set_profile_metadata_supported(supported);
            }
            Err(e) => warn!("Failed to probe homeserver capabilities: {e}"),
        }
    }

    pub fn registry(&self) -> &PuppetRegistry {
        &self.registry
    }
}

pub fn format_id(config: &Config, remote_id: i64) -> BridgeErrorResult<String> {
    let codec = RemoteIdCodec::new(config.bridge.clone(), config.homeserver.domain.clone());
    Ok(codec.format(remote_id)?)
}

pub fn parse_id(config: &Config, identity: &str) -> BridgeErrorResult<String> {
    let codec = RemoteIdCodec::new(config.bridge.clone(), config.homeserver.domain.clone());
    codec
        .parse(identity)
        .map(|remote_id| remote_id.to_string())
        .ok_or_else(|| BridgeError::NotAPuppet {
            identity: identity.to_string(),
        })
}

pub async fn check(bridge: &Bridge) -> BridgeErrorResult<String> {
    bridge.probe_capabilities().await;

    let bound = bridge.registry.get_all_with_custom_identity().await?;
    for puppet in &bound {
        if let Some(binding) = puppet.custom_binding().await {
            info!("Puppet {} is bound to {}", puppet.remote_id(), binding.identity);
        }
    }

    Ok(format!(
        "OK: {} bound puppet(s), profile metadata {}",
        bound.len(),
        if bridge.registry.profile_metadata_supported() {
            "enabled"
        } else {
            "disabled"
        }
    ))
}

/// Reads the stored record without creating the puppet.
pub async fn show(bridge: &Bridge, remote_id: i64) -> BridgeErrorResult<String> {
    let record = bridge
        .repository
        .find_by_remote_id(remote_id)
        .await?
        .ok_or(BridgeError::UnknownPuppet { remote_id })?;

    Ok(serde_json::to_string_pretty(&record)?)
}

pub async fn sync(
    bridge: &Bridge,
    remote_id: i64,
    snapshot: ProfileSnapshot,
) -> BridgeErrorResult<String> {
    bridge.probe_capabilities().await;

    let puppet = bridge.registry.get_by_remote_id(remote_id).await?;
    let changed = puppet.update_info(Some(&snapshot)).await;

    let record = puppet.record().await;
    Ok(format!(
        "{} {}: name={:?} (set: {}), avatar={:?} (set: {})",
        puppet.user_id(),
        if changed { "updated" } else { "unchanged" },
        record.name,
        record.name_set,
        record.avatar_url,
        record.avatar_set
    ))
}

pub async fn bind(
    bridge: &Bridge,
    remote_id: i64,
    identity: &str,
    access_token: Option<String>,
) -> BridgeErrorResult<String> {
    let puppet = bridge
        .registry
        .bind_custom_identity(remote_id, identity, access_token)
        .await?;
    Ok(format!("{identity} now acts as {}", puppet.user_id()))
}

pub async fn unbind(bridge: &Bridge, remote_id: i64) -> BridgeErrorResult<String> {
    bridge.registry.unbind_custom_identity(remote_id).await?;
    Ok(format!("Puppet {remote_id} has no linked user"))
}
