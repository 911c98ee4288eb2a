#![allow(dead_code)]

use mp_core::{CustomBinding, PuppetRecord};

/// Creates a puppet record with a confirmed profile
pub fn create_test_puppet(remote_id: i64) -> PuppetRecord {
    PuppetRecord {
        remote_id,
        username: format!("user{remote_id}"),
        name: format!("User {remote_id}"),
        name_set: true,
        avatar_id: "avatar.jpg".to_string(),
        avatar_set: true,
        avatar_url: format!("mxc://example.org/{remote_id}"),
        contact_info_set: false,
        custom: None,
    }
}

/// Creates a puppet record bound to a local user
pub fn create_bound_puppet(remote_id: i64, identity: &str) -> PuppetRecord {
    PuppetRecord {
        custom: Some(CustomBinding {
            identity: identity.to_string(),
            access_token: Some("syt_token".to_string()),
        }),
        ..create_test_puppet(remote_id)
    }
}
