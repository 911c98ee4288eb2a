use crate::{ConversationContext, ConversationKind};

#[test]
fn test_private_conversation_has_counterpart() {
    let conversation = ConversationContext::private(42);

    assert_eq!(conversation.kind, ConversationKind::Private);
    assert!(conversation.is_private_chat());
    assert_eq!(conversation.counterpart(), Some(42));
}

#[test]
fn test_group_conversation_has_no_counterpart() {
    let conversation = ConversationContext::group(42).with_room("!room:example.org");

    assert!(!conversation.is_private_chat());
    assert_eq!(conversation.counterpart(), None);
    assert_eq!(conversation.room_id.as_deref(), Some("!room:example.org"));
}
