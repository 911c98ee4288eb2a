//! Profile synchronization: converge a puppet's local profile on the latest
//! remote snapshot with as few writes as possible.
//!
//! Every field is handled independently. A failed write leaves the matching
//! `*_set` flag false so the next snapshot retries it, and never stops the
//! other fields from being processed.

use crate::avatar::{avatar_fingerprint, sniff_content_type};
use crate::conversation::PuppetProfile;
use crate::registry::RegistryShared;
use crate::{ConversationDirectory, Puppet};

use mp_config::DisplaynameParams;
use mp_core::{ProfileSnapshot, PuppetRecord};

use std::sync::Arc;

use log::{debug, error, trace, warn};
use serde_json::json;

impl Puppet {
    /// Apply a remote profile snapshot. Returns whether anything changed.
    ///
    /// Concurrent calls for the same puppet run one after another. Dropping
    /// the returned future before it completes leaves the in-memory record
    /// untouched, but profile writes already sent and a save already issued
    /// stay done.
    pub async fn update_info(&self, snapshot: Option<&ProfileSnapshot>) -> bool {
        let Some(snapshot) = snapshot else {
            debug!("Not updating puppet {}: no profile info", self.remote_id);
            return false;
        };

        let Some(shared) = self.registry.upgrade() else {
            warn!(
                "Not updating puppet {}: registry has been dropped",
                self.remote_id
            );
            return false;
        };

        let _sync = self.sync_lock.lock().await;
        trace!("Updating info of puppet {}", self.remote_id);

        let mut working = self.state.read().await.clone();
        let mut profile_changed = false;

        if let Some(username) = &snapshot.username
            && working.username != *username
        {
            working.username = username.clone();
            profile_changed = true;
        }

        if let Some(display_name) = &snapshot.display_name {
            profile_changed |= self.update_name(&shared, &mut working, display_name).await;
        }

        if let Some(avatar_url) = &snapshot.avatar_url {
            profile_changed |= self.update_avatar(&shared, &mut working, avatar_url).await;
        }

        if profile_changed {
            // Identifiers are derived from the username, republish them.
            working.contact_info_set = false;
        }
        let metadata_changed = self.update_contact_info(&shared, &mut working).await;

        if !profile_changed && !metadata_changed {
            return false;
        }

        let profile = self.commit(&shared, working).await;
        if profile_changed {
            spawn_conversation_refresh(Arc::clone(&shared.services.conversations), profile);
        }
        debug!("Puppet {} info updated", self.remote_id);

        true
    }

    /// Push structured contact metadata if the homeserver supports it and it
    /// has not been confirmed yet.
    async fn update_contact_info(&self, shared: &RegistryShared, working: &mut PuppetRecord) -> bool {
        if !shared.profile_metadata_supported() || working.contact_info_set {
            return false;
        }

        let network = shared.bridge.mode.network_name();
        let identifiers: Vec<String> = if working.username.is_empty() {
            Vec::new()
        } else {
            vec![format!("{network}:{}", working.username)]
        };

        let metadata = json!({
            "com.beeper.bridge.identifiers": identifiers,
            "com.beeper.bridge.remote_id": self.remote_id,
            "com.beeper.bridge.service": shared.bridge.mode.service_name(),
            "com.beeper.bridge.network": network,
        });

        match shared
            .services
            .profile_writer
            .set_profile_metadata(&self.user_id, &metadata)
            .await
        {
            Ok(()) => {
                working.contact_info_set = true;
                true
            }
            Err(e) => {
                error!(
                    "Failed to store contact info in profile of puppet {}: {e}",
                    self.remote_id
                );
                false
            }
        }
    }

    async fn update_name(
        &self,
        shared: &RegistryShared,
        working: &mut PuppetRecord,
        display_name: &str,
    ) -> bool {
        let new_name = shared.bridge.format_displayname(DisplaynameParams {
            display_name,
            username: &working.username,
            id: self.remote_id,
        });

        if working.name_set && working.name == new_name {
            return false;
        }

        working.name = new_name;
        working.name_set = false;

        match shared
            .services
            .profile_writer
            .set_display_name(&self.user_id, &working.name)
            .await
        {
            Ok(()) => working.name_set = true,
            Err(e) => error!(
                "Failed to update display name of puppet {}: {e}",
                self.remote_id
            ),
        }

        true
    }

    async fn update_avatar(
        &self,
        shared: &RegistryShared,
        working: &mut PuppetRecord,
        avatar_url: &str,
    ) -> bool {
        let new_avatar_id = avatar_fingerprint(avatar_url);
        if working.avatar_id == new_avatar_id && working.avatar_set {
            return false;
        }

        working.avatar_id = new_avatar_id;
        working.avatar_set = false;
        working.avatar_url.clear();

        let writer = &shared.services.profile_writer;

        if working.avatar_id.is_empty() {
            match writer.set_avatar_url(&self.user_id, "").await {
                Ok(()) => {
                    debug!("Avatar of puppet {} removed", self.remote_id);
                    working.avatar_set = true;
                }
                Err(e) => error!("Failed to remove avatar of puppet {}: {e}", self.remote_id),
            }
            return true;
        }

        let data = match shared.services.avatar_source.download(avatar_url).await {
            Ok(data) => data,
            Err(e) => {
                error!(
                    "Failed to download new avatar {} of puppet {}: {e}",
                    working.avatar_id, self.remote_id
                );
                return true;
            }
        };

        let content_type = sniff_content_type(&data);
        working.avatar_url = match writer.upload_media(&self.user_id, data, content_type).await {
            Ok(content_uri) => content_uri,
            Err(e) => {
                error!(
                    "Failed to upload new avatar {} of puppet {}: {e}",
                    working.avatar_id, self.remote_id
                );
                return true;
            }
        };

        match writer.set_avatar_url(&self.user_id, &working.avatar_url).await {
            Ok(()) => {
                debug!(
                    "Avatar of puppet {} updated to {} ({})",
                    self.remote_id, working.avatar_url, working.avatar_id
                );
                working.avatar_set = true;
            }
            Err(e) => error!("Failed to update avatar of puppet {}: {e}", self.remote_id),
        }

        true
    }

    /// Persist the working copy, then publish it. A failed save is logged and
    /// the copy is published anyway; the next successful save reconciles it.
    async fn commit(&self, shared: &RegistryShared, mut working: PuppetRecord) -> PuppetProfile {
        let mut state = self.state.write().await;
        // The binding may have changed while we were syncing.
        working.custom = state.custom.clone();

        if let Err(e) = shared.services.store.update(&working).await {
            error!(
                "Failed to save puppet {} to database after updating: {e}",
                self.remote_id
            );
        }

        *state = working;
        self.profile_of(&state)
    }
}

/// Let every private chat with this puppet refresh its name and avatar.
/// Runs detached: a slow or failing room never delays the profile update.
fn spawn_conversation_refresh(conversations: Arc<dyn ConversationDirectory>, profile: PuppetProfile) {
    tokio::spawn(async move {
        let targets = match conversations.private_conversations_with(profile.remote_id).await {
            Ok(targets) => targets,
            Err(e) => {
                warn!(
                    "Failed to find conversations of puppet {}: {e}",
                    profile.remote_id
                );
                return;
            }
        };

        for conversation in &targets {
            if let Err(e) = conversations.refresh_from_puppet(conversation, &profile).await {
                warn!(
                    "Failed to refresh conversation {} from puppet {}: {e}",
                    conversation.thread_id, profile.remote_id
                );
            }
        }
    });
}
