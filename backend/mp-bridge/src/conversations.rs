use mp_core::ConversationContext;
use mp_puppet::{ConversationDirectory, PuppetProfile, Result as PuppetErrorResult};

use async_trait::async_trait;
use log::debug;

/// Directory for a bridge process that bridges no rooms. Profile changes are
/// still written to the homeserver, there is just nothing to refresh.
#[derive(Debug, Default)]
pub struct DetachedConversations;

#[async_trait]
impl ConversationDirectory for DetachedConversations {
    async fn private_conversations_with(
        &self,
        remote_id: i64,
    ) -> PuppetErrorResult<Vec<ConversationContext>> {
        debug!("No bridged conversations to refresh for puppet {remote_id}");
        Ok(Vec::new())
    }

    async fn refresh_from_puppet(
        &self,
        conversation: &ConversationContext,
        profile: &PuppetProfile,
    ) -> PuppetErrorResult<()> {
        debug!(
            "Ignoring refresh of conversation {} from puppet {}",
            conversation.thread_id, profile.remote_id
        );
        Ok(())
    }
}
