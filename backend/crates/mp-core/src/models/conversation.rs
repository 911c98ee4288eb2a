//! Conversation contexts a puppet can act in.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    /// One-to-one chat with a single remote account
    Private,
    Group,
}

/// A bridged conversation as seen by the identity layer.
///
/// `thread_id` is the remote thread key. For private chats it is the remote
/// account on the other side of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationContext {
    pub thread_id: i64,
    pub kind: ConversationKind,
    /// Local room the conversation is bridged into, if it has been created
    pub room_id: Option<String>,
}

impl ConversationContext {
    pub fn private(counterpart: i64) -> Self {
        Self {
            thread_id: counterpart,
            kind: ConversationKind::Private,
            room_id: None,
        }
    }

    pub fn group(thread_id: i64) -> Self {
        Self {
            thread_id,
            kind: ConversationKind::Group,
            room_id: None,
        }
    }

    pub fn with_room(mut self, room_id: impl Into<String>) -> Self {
        self.room_id = Some(room_id.into());
        self
    }

    pub fn is_private_chat(&self) -> bool {
        self.kind == ConversationKind::Private
    }

    /// Remote account on the other side of a private chat
    pub fn counterpart(&self) -> Option<i64> {
        self.is_private_chat().then_some(self.thread_id)
    }
}
