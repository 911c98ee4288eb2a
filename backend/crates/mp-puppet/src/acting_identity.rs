//! Chooses which identity a puppet acts as inside a conversation.

use mp_core::{ConversationContext, CustomBinding};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActingIdentity {
    /// The bridge-owned puppet identity
    Default { user_id: String },
    /// A local user's own account, linked to the puppet
    Custom(CustomBinding),
}

impl ActingIdentity {
    pub fn user_id(&self) -> &str {
        match self {
            Self::Default { user_id } => user_id,
            Self::Custom(binding) => &binding.identity,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

/// The bound identity is used everywhere except the private chat with the
/// puppet's own remote account: a user never puppets themselves there.
pub fn select_acting_identity(
    remote_id: i64,
    default_user_id: &str,
    binding: Option<&CustomBinding>,
    conversation: &ConversationContext,
) -> ActingIdentity {
    match binding {
        Some(binding) if conversation.counterpart() != Some(remote_id) => {
            ActingIdentity::Custom(binding.clone())
        }
        _ => ActingIdentity::Default {
            user_id: default_user_id.to_string(),
        },
    }
}
