//! In-memory puppet entity handed out by the registry.

use crate::acting_identity::{ActingIdentity, select_acting_identity};
use crate::conversation::PuppetProfile;
use crate::registry::RegistryShared;

use mp_core::{ConversationContext, CustomBinding, PuppetRecord};

use std::sync::Weak;

use tokio::sync::{Mutex, RwLock};

/// A local stand-in for one remote account.
///
/// At most one instance exists per remote ID; the registry owns it and hands
/// out `Arc<Puppet>`. Profile synchronization for a single puppet is
/// serialized by `sync_lock`, while `state` is only held for short reads and
/// for commit + persist.
pub struct Puppet {
    pub(crate) remote_id: i64,
    pub(crate) user_id: String,
    pub(crate) state: RwLock<PuppetRecord>,
    pub(crate) sync_lock: Mutex<()>,
    pub(crate) registry: Weak<RegistryShared>,
}

impl Puppet {
    pub(crate) fn new(record: PuppetRecord, user_id: String, registry: Weak<RegistryShared>) -> Self {
        Self {
            remote_id: record.remote_id,
            user_id,
            state: RwLock::new(record),
            sync_lock: Mutex::new(()),
            registry,
        }
    }

    pub fn remote_id(&self) -> i64 {
        self.remote_id
    }

    /// The puppet's own local identity, derived from the remote ID
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Snapshot of the current record
    pub async fn record(&self) -> PuppetRecord {
        self.state.read().await.clone()
    }

    pub async fn display_name(&self) -> String {
        self.state.read().await.name.clone()
    }

    pub async fn custom_binding(&self) -> Option<CustomBinding> {
        self.state.read().await.custom.clone()
    }

    pub fn default_identity(&self) -> ActingIdentity {
        ActingIdentity::Default {
            user_id: self.user_id.clone(),
        }
    }

    /// Identity to send events as inside `conversation`
    pub async fn acting_identity_for(&self, conversation: &ConversationContext) -> ActingIdentity {
        let state = self.state.read().await;
        select_acting_identity(
            self.remote_id,
            &self.user_id,
            state.custom.as_ref(),
            conversation,
        )
    }

    pub(crate) fn profile_of(&self, record: &PuppetRecord) -> PuppetProfile {
        PuppetProfile {
            remote_id: self.remote_id,
            user_id: self.user_id.clone(),
            name: record.name.clone(),
            avatar_url: record.avatar_url.clone(),
            avatar_set: record.avatar_set,
        }
    }
}

impl std::fmt::Debug for Puppet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Puppet")
            .field("remote_id", &self.remote_id)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}
