use crate::Result as PuppetErrorResult;

use mp_core::ConversationContext;

use async_trait::async_trait;

/// Profile fields a conversation needs to refresh its own metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuppetProfile {
    pub remote_id: i64,
    pub user_id: String,
    pub name: String,
    pub avatar_url: String,
    pub avatar_set: bool,
}

/// Lookup into the conversation/room layer.
#[async_trait]
pub trait ConversationDirectory: Send + Sync {
    /// Private chats whose counterpart is `remote_id`
    async fn private_conversations_with(
        &self,
        remote_id: i64,
    ) -> PuppetErrorResult<Vec<ConversationContext>>;

    async fn refresh_from_puppet(
        &self,
        conversation: &ConversationContext,
        profile: &PuppetProfile,
    ) -> PuppetErrorResult<()>;
}
