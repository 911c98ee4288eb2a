//! Durable puppet record - one per remote account, never deleted.

use serde::{Deserialize, Serialize};

/// A local user who linked their own account to this puppet ("double puppet").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomBinding {
    pub identity: String,
    pub access_token: Option<String>,
}

/// Persisted state of a puppet.
///
/// The local identity is not stored; it is always derived from `remote_id`.
/// Every `*_set` flag means the last write of the matching value to the local
/// profile succeeded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuppetRecord {
    pub remote_id: i64,
    pub username: String,
    pub name: String,
    pub name_set: bool,
    /// Fingerprint of the remote avatar the local one was built from
    pub avatar_id: String,
    pub avatar_set: bool,
    /// Local media reference of the uploaded avatar, empty when there is none
    pub avatar_url: String,
    pub contact_info_set: bool,
    pub custom: Option<CustomBinding>,
}

impl PuppetRecord {
    /// Create an empty record for a newly seen remote account
    pub fn new(remote_id: i64) -> Self {
        Self {
            remote_id,
            ..Self::default()
        }
    }

    pub fn custom_identity(&self) -> Option<&str> {
        self.custom.as_ref().map(|c| c.identity.as_str())
    }

    pub fn has_custom_identity(&self) -> bool {
        self.custom.is_some()
    }
}
