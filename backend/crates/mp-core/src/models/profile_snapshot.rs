use serde::{Deserialize, Serialize};

/// Remote profile data observed for one account.
///
/// Every field is optional: `None` means the remote side did not say anything
/// about it and the stored value is kept. `Some("")` for the avatar means the
/// account has no avatar.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileSnapshot {
    pub fn new(
        username: impl Into<String>,
        display_name: impl Into<String>,
        avatar_url: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            display_name: Some(display_name.into()),
            avatar_url: Some(avatar_url.into()),
        }
    }
}
