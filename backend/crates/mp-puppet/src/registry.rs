//! Process-wide cache of puppets.
//!
//! The registry is the only place puppets are created. Lookups that miss the
//! cache go to the store while the registry lock is held, so two concurrent
//! first lookups of the same remote ID can never both insert.

use crate::{
    AvatarSource, ConversationDirectory, ProfileWriter, Puppet, PuppetError, PuppetStore,
    RemoteIdCodec, Result as PuppetErrorResult,
};

use mp_config::{BridgeConfig, ProfileMetadataMode};
use mp_core::{CustomBinding, PuppetRecord};

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{error, info, warn};
use tokio::sync::Mutex;

/// Collaborators shared by every puppet.
#[derive(Clone)]
pub struct PuppetServices {
    pub store: Arc<dyn PuppetStore>,
    pub profile_writer: Arc<dyn ProfileWriter>,
    pub avatar_source: Arc<dyn AvatarSource>,
    pub conversations: Arc<dyn ConversationDirectory>,
}

pub(crate) struct RegistryShared {
    pub(crate) codec: RemoteIdCodec,
    pub(crate) bridge: BridgeConfig,
    pub(crate) services: PuppetServices,
    profile_metadata_supported: AtomicBool,
    inner: Mutex<RegistryInner>,
}

impl RegistryShared {
    pub(crate) fn profile_metadata_supported(&self) -> bool {
        self.profile_metadata_supported.load(Ordering::Relaxed)
    }
}

struct RegistryInner {
    puppets: HashMap<i64, Arc<Puppet>>,
    by_custom_identity: HashMap<String, Arc<Puppet>>,
}

#[derive(Clone)]
pub struct PuppetRegistry {
    shared: Arc<RegistryShared>,
}

impl PuppetRegistry {
    pub fn new(bridge: BridgeConfig, domain: impl Into<String>, services: PuppetServices) -> Self {
        let profile_metadata = bridge.profile_metadata == ProfileMetadataMode::Enabled;

        Self {
            shared: Arc::new(RegistryShared {
                codec: RemoteIdCodec::new(bridge.clone(), domain),
                bridge,
                services,
                profile_metadata_supported: AtomicBool::new(profile_metadata),
                inner: Mutex::new(RegistryInner {
                    puppets: HashMap::new(),
                    by_custom_identity: HashMap::new(),
                }),
            }),
        }
    }

    /// Toggle publishing of structured contact metadata, e.g. after probing
    /// the homeserver's capabilities.
    pub fn set_profile_metadata_supported(&self, supported: bool) {
        self.shared
            .profile_metadata_supported
            .store(supported, Ordering::Relaxed);
    }

    pub fn profile_metadata_supported(&self) -> bool {
        self.shared.profile_metadata_supported()
    }

    #[track_caller]
    pub fn format_local_identity(&self, remote_id: i64) -> PuppetErrorResult<String> {
        self.shared.codec.format(remote_id)
    }

    pub fn parse_local_identity(&self, identity: &str) -> Option<i64> {
        self.shared.codec.parse(identity)
    }

    /// Get the puppet for a remote account, creating it on first sight.
    pub async fn get_by_remote_id(&self, remote_id: i64) -> PuppetErrorResult<Arc<Puppet>> {
        if remote_id <= 0 {
            error!("Puppet lookup with invalid remote ID {remote_id}");
            return Err(PuppetError::invalid_argument(format!(
                "remote ID must be positive, got {remote_id}"
            )));
        }

        let mut inner = self.shared.inner.lock().await;

        if let Some(puppet) = inner.puppets.get(&remote_id) {
            return Ok(Arc::clone(puppet));
        }

        let store = &self.shared.services.store;
        let record = match store.get_by_remote_id(remote_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                let record = PuppetRecord::new(remote_id);
                if let Err(e) = store.insert(&record).await {
                    error!("Failed to insert new puppet {remote_id}: {e}");
                    return Err(e);
                }
                info!("Created puppet {remote_id}");
                record
            }
            Err(e) => {
                error!("Failed to get puppet {remote_id} from database: {e}");
                return Err(e);
            }
        };

        self.cache_puppet(&mut inner, record)
    }

    /// Get the puppet for a puppet identity such as `@meta_42:example.org`.
    /// Returns `None` if the identity is not a puppet identity.
    pub async fn get_by_local_identity(
        &self,
        identity: &str,
    ) -> PuppetErrorResult<Option<Arc<Puppet>>> {
        match self.parse_local_identity(identity) {
            Some(remote_id) => self.get_by_remote_id(remote_id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Get the puppet a local user has bound themselves to. Never creates.
    pub async fn get_by_custom_identity(&self, identity: &str) -> PuppetErrorResult<Arc<Puppet>> {
        let mut inner = self.shared.inner.lock().await;

        if let Some(puppet) = inner.by_custom_identity.get(identity) {
            return Ok(Arc::clone(puppet));
        }

        let record = match self.shared.services.store.get_by_custom_identity(identity).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return Err(PuppetError::not_found(format!(
                    "no puppet is bound to {identity}"
                )));
            }
            Err(e) => {
                error!("Failed to get puppet bound to {identity} from database: {e}");
                return Err(e);
            }
        };

        if let Some(puppet) = inner.puppets.get(&record.remote_id).cloned() {
            // Cached before the binding was known here; adopt the stored binding.
            puppet.state.write().await.custom = record.custom.clone();
            inner
                .by_custom_identity
                .insert(identity.to_string(), Arc::clone(&puppet));
            return Ok(puppet);
        }

        self.cache_puppet(&mut inner, record)
    }

    /// All puppets that have a bound local user, e.g. to restore double
    /// puppeting at startup.
    pub async fn get_all_with_custom_identity(&self) -> PuppetErrorResult<Vec<Arc<Puppet>>> {
        let records = self
            .shared
            .services
            .store
            .get_all_with_custom_identity()
            .await
            .inspect_err(|e| error!("Failed to get all puppets with custom identity: {e}"))?;

        let mut inner = self.shared.inner.lock().await;
        let mut puppets = Vec::with_capacity(records.len());

        for record in records {
            let puppet = match inner.puppets.get(&record.remote_id) {
                Some(puppet) => Arc::clone(puppet),
                None => self.cache_puppet(&mut inner, record)?,
            };
            puppets.push(puppet);
        }

        Ok(puppets)
    }

    /// Bind a local user to a puppet so they act as it in bridged rooms.
    ///
    /// The binding is saved first and only published in memory once the
    /// store accepted it, so a rejected bind leaves the puppet unchanged.
    pub async fn bind_custom_identity(
        &self,
        remote_id: i64,
        identity: &str,
        access_token: Option<String>,
    ) -> PuppetErrorResult<Arc<Puppet>> {
        if identity.is_empty() {
            return Err(PuppetError::invalid_argument("custom identity is empty"));
        }

        let puppet = self.get_by_remote_id(remote_id).await?;
        let mut inner = self.shared.inner.lock().await;

        let owner = match inner.by_custom_identity.get(identity) {
            Some(other) => Some(other.remote_id),
            // The owner may be stored but not cached yet.
            None => self
                .shared
                .services
                .store
                .get_by_custom_identity(identity)
                .await
                .inspect_err(|e| error!("Failed to look up owner of {identity}: {e}"))?
                .map(|record| record.remote_id),
        };
        if let Some(owner) = owner
            && owner != remote_id
        {
            warn!("Refusing to bind {identity} to puppet {remote_id}: bound to {owner}");
            return Err(PuppetError::already_bound(identity, Some(owner)));
        }

        let mut state = puppet.state.write().await;
        let mut updated = state.clone();
        let previous = updated.custom.replace(CustomBinding {
            identity: identity.to_string(),
            access_token,
        });

        self.shared
            .services
            .store
            .update(&updated)
            .await
            .inspect_err(|e| error!("Failed to save binding of puppet {remote_id}: {e}"))?;

        if let Some(previous) = previous
            && previous.identity != identity
        {
            inner.by_custom_identity.remove(&previous.identity);
        }
        inner
            .by_custom_identity
            .insert(identity.to_string(), Arc::clone(&puppet));
        *state = updated;
        info!("Bound {identity} to puppet {remote_id}");

        drop(state);
        Ok(puppet)
    }

    /// Remove a puppet's binding. The puppet itself is kept.
    pub async fn unbind_custom_identity(&self, remote_id: i64) -> PuppetErrorResult<()> {
        let puppet = self.get_by_remote_id(remote_id).await?;
        let mut inner = self.shared.inner.lock().await;
        let mut state = puppet.state.write().await;

        let mut updated = state.clone();
        let Some(previous) = updated.custom.take() else {
            warn!("Puppet {remote_id} has no custom identity to unbind");
            return Ok(());
        };

        self.shared
            .services
            .store
            .update(&updated)
            .await
            .inspect_err(|e| error!("Failed to save unbinding of puppet {remote_id}: {e}"))?;

        inner.by_custom_identity.remove(&previous.identity);
        *state = updated;
        info!("Unbound {} from puppet {remote_id}", previous.identity);

        Ok(())
    }

    fn cache_puppet(
        &self,
        inner: &mut RegistryInner,
        record: PuppetRecord,
    ) -> PuppetErrorResult<Arc<Puppet>> {
        let remote_id = record.remote_id;
        let user_id = self.shared.codec.format(remote_id)?;
        let custom_identity = record.custom_identity().map(str::to_string);

        let puppet = Arc::new(Puppet::new(record, user_id, Arc::downgrade(&self.shared)));
        inner.puppets.insert(remote_id, Arc::clone(&puppet));
        if let Some(identity) = custom_identity {
            inner.by_custom_identity.insert(identity, Arc::clone(&puppet));
        }

        Ok(puppet)
    }
}
