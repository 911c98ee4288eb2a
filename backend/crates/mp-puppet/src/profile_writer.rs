use crate::Result as PuppetErrorResult;

use async_trait::async_trait;
use serde_json::Value;

/// Writes to the local profile of a puppet (or of a bound local user).
///
/// Every call is addressed to a local identity, e.g. `@meta_42:example.org`.
#[async_trait]
pub trait ProfileWriter: Send + Sync {
    async fn set_display_name(&self, user_id: &str, name: &str) -> PuppetErrorResult<()>;

    /// An empty `content_uri` removes the avatar
    async fn set_avatar_url(&self, user_id: &str, content_uri: &str) -> PuppetErrorResult<()>;

    /// Upload media and return its content URI
    async fn upload_media(
        &self,
        user_id: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> PuppetErrorResult<String>;

    /// Publish arbitrary structured fields on the profile
    async fn set_profile_metadata(&self, user_id: &str, metadata: &Value) -> PuppetErrorResult<()>;
}
