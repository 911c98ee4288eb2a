use mp_core::{ConversationContext, PuppetRecord};
use mp_puppet::{
    AvatarSource, ConversationDirectory, ProfileWriter, PuppetError, PuppetProfile, PuppetStore,
    Result as PuppetErrorResult,
};

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

/// In-memory store with call counters and failure switches
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<i64, PuppetRecord>>,
    pub inserts: AtomicUsize,
    pub updates: AtomicUsize,
    pub fail_reads: AtomicBool,
    pub fail_updates: AtomicBool,
    /// Delay applied to every read, to widen race windows
    pub read_delay_ms: AtomicUsize,
    pub update_delay_ms: AtomicUsize,
}

impl MemoryStore {
    pub fn seed(&self, record: PuppetRecord) {
        self.records.lock().unwrap().insert(record.remote_id, record);
    }

    pub fn stored(&self, remote_id: i64) -> Option<PuppetRecord> {
        self.records.lock().unwrap().get(&remote_id).cloned()
    }

    async fn before_read(&self) -> PuppetErrorResult<()> {
        let delay = self.read_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(PuppetError::persistence("store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl PuppetStore for MemoryStore {
    async fn get_by_remote_id(&self, remote_id: i64) -> PuppetErrorResult<Option<PuppetRecord>> {
        self.before_read().await?;
        Ok(self.stored(remote_id))
    }

    async fn get_by_custom_identity(
        &self,
        identity: &str,
    ) -> PuppetErrorResult<Option<PuppetRecord>> {
        self.before_read().await?;
        Ok(self
            .records
            .lock()
            .unwrap()
            .values()
            .find(|r| r.custom_identity() == Some(identity))
            .cloned())
    }

    async fn get_all_with_custom_identity(&self) -> PuppetErrorResult<Vec<PuppetRecord>> {
        self.before_read().await?;
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.has_custom_identity())
            .cloned()
            .collect();
        records.sort_by_key(|r| r.remote_id);
        Ok(records)
    }

    async fn insert(&self, puppet: &PuppetRecord) -> PuppetErrorResult<()> {
        self.inserts.fetch_add(1, Ordering::SeqCst);
        let mut records = self.records.lock().unwrap();
        if records.contains_key(&puppet.remote_id) {
            return Err(PuppetError::persistence("duplicate remote ID"));
        }
        records.insert(puppet.remote_id, puppet.clone());
        Ok(())
    }

    async fn update(&self, puppet: &PuppetRecord) -> PuppetErrorResult<()> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        let delay = self.update_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        if self.fail_updates.load(Ordering::SeqCst) {
            return Err(PuppetError::persistence("disk full"));
        }
        self.seed(puppet.clone());
        Ok(())
    }
}

/// Profile writer that records every call
#[derive(Default)]
pub struct RecordingProfileWriter {
    pub display_names: Mutex<Vec<(String, String)>>,
    pub avatar_urls: Mutex<Vec<(String, String)>>,
    pub uploads: Mutex<Vec<(String, usize, String)>>,
    pub metadata: Mutex<Vec<(String, Value)>>,
    pub fail_display_name: AtomicBool,
    pub fail_avatar_url: AtomicBool,
    pub fail_upload: AtomicBool,
    pub fail_metadata: AtomicBool,
}

impl RecordingProfileWriter {
    pub fn display_name_calls(&self) -> usize {
        self.display_names.lock().unwrap().len()
    }

    pub fn avatar_url_calls(&self) -> usize {
        self.avatar_urls.lock().unwrap().len()
    }

    pub fn upload_calls(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata.lock().unwrap().len()
    }
}

#[async_trait]
impl ProfileWriter for RecordingProfileWriter {
    async fn set_display_name(&self, user_id: &str, name: &str) -> PuppetErrorResult<()> {
        self.display_names
            .lock()
            .unwrap()
            .push((user_id.to_string(), name.to_string()));
        if self.fail_display_name.load(Ordering::SeqCst) {
            return Err(PuppetError::local_write("M_FORBIDDEN"));
        }
        Ok(())
    }

    async fn set_avatar_url(&self, user_id: &str, content_uri: &str) -> PuppetErrorResult<()> {
        self.avatar_urls
            .lock()
            .unwrap()
            .push((user_id.to_string(), content_uri.to_string()));
        if self.fail_avatar_url.load(Ordering::SeqCst) {
            return Err(PuppetError::local_write("M_FORBIDDEN"));
        }
        Ok(())
    }

    async fn upload_media(
        &self,
        user_id: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> PuppetErrorResult<String> {
        let count = {
            let mut uploads = self.uploads.lock().unwrap();
            uploads.push((user_id.to_string(), data.len(), content_type.to_string()));
            uploads.len()
        };
        // Yield so concurrent syncs would overlap here if not serialized
        tokio::time::sleep(Duration::from_millis(10)).await;
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(PuppetError::local_write("M_TOO_LARGE"));
        }
        Ok(format!("mxc://example.org/media{count}"))
    }

    async fn set_profile_metadata(&self, user_id: &str, metadata: &Value) -> PuppetErrorResult<()> {
        self.metadata
            .lock()
            .unwrap()
            .push((user_id.to_string(), metadata.clone()));
        if self.fail_metadata.load(Ordering::SeqCst) {
            return Err(PuppetError::local_write("M_UNRECOGNIZED"));
        }
        Ok(())
    }
}

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

/// Serves a small JPEG for every URL unless told to fail
#[derive(Default)]
pub struct FakeAvatarSource {
    pub downloads: AtomicUsize,
    pub fail: AtomicBool,
}

#[async_trait]
impl AvatarSource for FakeAvatarSource {
    async fn download(&self, _url: &str) -> PuppetErrorResult<Vec<u8>> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(PuppetError::remote_fetch("unexpected status code 404"));
        }
        Ok(JPEG_BYTES.to_vec())
    }
}

/// Conversation directory that reports refreshes over a channel
pub struct RecordingDirectory {
    pub private_chats: Mutex<HashMap<i64, Vec<ConversationContext>>>,
    refreshed_tx: mpsc::UnboundedSender<(ConversationContext, PuppetProfile)>,
    refreshed_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<(ConversationContext, PuppetProfile)>>,
}

impl Default for RecordingDirectory {
    fn default() -> Self {
        let (refreshed_tx, refreshed_rx) = mpsc::unbounded_channel();
        Self {
            private_chats: Mutex::new(HashMap::new()),
            refreshed_tx,
            refreshed_rx: tokio::sync::Mutex::new(refreshed_rx),
        }
    }
}

impl RecordingDirectory {
    pub fn add_private_chat(&self, remote_id: i64, room_id: &str) {
        self.private_chats
            .lock()
            .unwrap()
            .entry(remote_id)
            .or_default()
            .push(ConversationContext::private(remote_id).with_room(room_id));
    }

    /// Wait for the next refresh, or `None` after a short timeout
    pub async fn next_refresh(&self) -> Option<(ConversationContext, PuppetProfile)> {
        let mut rx = self.refreshed_rx.lock().await;
        tokio::time::timeout(Duration::from_millis(500), rx.recv())
            .await
            .ok()
            .flatten()
    }
}

#[async_trait]
impl ConversationDirectory for RecordingDirectory {
    async fn private_conversations_with(
        &self,
        remote_id: i64,
    ) -> PuppetErrorResult<Vec<ConversationContext>> {
        Ok(self
            .private_chats
            .lock()
            .unwrap()
            .get(&remote_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn refresh_from_puppet(
        &self,
        conversation: &ConversationContext,
        profile: &PuppetProfile,
    ) -> PuppetErrorResult<()> {
        let _ = self
            .refreshed_tx
            .send((conversation.clone(), profile.clone()));
        Ok(())
    }
}
