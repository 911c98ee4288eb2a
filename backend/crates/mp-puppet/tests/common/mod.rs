#![allow(dead_code)]

mod fakes;

pub use fakes::*;

use mp_config::{BridgeConfig, ProfileMetadataMode};
use mp_puppet::{PuppetRegistry, PuppetServices};

use std::sync::Arc;

pub const DOMAIN: &str = "example.org";

/// Handles to every fake behind a registry
pub struct TestHarness {
    pub registry: PuppetRegistry,
    pub store: Arc<MemoryStore>,
    pub writer: Arc<RecordingProfileWriter>,
    pub avatars: Arc<FakeAvatarSource>,
    pub conversations: Arc<RecordingDirectory>,
}

pub fn bridge_config(profile_metadata: ProfileMetadataMode) -> BridgeConfig {
    BridgeConfig {
        username_template: "user_{userid}".to_string(),
        displayname_template: "{displayname} (Instagram)".to_string(),
        profile_metadata,
        ..Default::default()
    }
}

pub fn create_harness() -> TestHarness {
    create_harness_with(bridge_config(ProfileMetadataMode::Disabled))
}

pub fn create_harness_with(bridge: BridgeConfig) -> TestHarness {
    let store = Arc::new(MemoryStore::default());
    let writer = Arc::new(RecordingProfileWriter::default());
    let avatars = Arc::new(FakeAvatarSource::default());
    let conversations = Arc::new(RecordingDirectory::default());

    let services = PuppetServices {
        store: store.clone(),
        profile_writer: writer.clone(),
        avatar_source: avatars.clone(),
        conversations: conversations.clone(),
    };

    TestHarness {
        registry: PuppetRegistry::new(bridge, DOMAIN, services),
        store,
        writer,
        avatars,
        conversations,
    }
}
