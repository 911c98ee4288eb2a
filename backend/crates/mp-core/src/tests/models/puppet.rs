use crate::{CustomBinding, PuppetRecord};

#[test]
fn test_new_record_is_unconfirmed() {
    let record = PuppetRecord::new(7);

    assert_eq!(record.remote_id, 7);
    assert!(!record.name_set);
    assert!(!record.avatar_set);
    assert!(!record.contact_info_set);
    assert!(record.avatar_url.is_empty());
    assert!(!record.has_custom_identity());
}

#[test]
fn test_custom_identity_accessor() {
    let mut record = PuppetRecord::new(7);
    record.custom = Some(CustomBinding {
        identity: "@alice:example.org".to_string(),
        access_token: None,
    });

    assert_eq!(record.custom_identity(), Some("@alice:example.org"));
}
