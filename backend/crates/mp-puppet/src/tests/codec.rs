use crate::RemoteIdCodec;

use mp_config::BridgeConfig;

use std::sync::Arc;

use googletest::prelude::*;

fn codec(template: &str) -> RemoteIdCodec {
    let bridge = BridgeConfig {
        username_template: template.to_string(),
        ..Default::default()
    };
    RemoteIdCodec::new(bridge, "example.org")
}

#[test]
fn given_template_when_formatting_then_id_replaces_placeholder() {
    // Given
    let codec = codec("user_{userid}");

    // When
    let identity = codec.format(42).unwrap();

    // Then
    assert_that!(identity, eq("@user_42:example.org"));
}

#[test]
fn given_formatted_identity_when_parsing_then_returns_original_id() {
    // Given
    let codec = codec("meta_{userid}_puppet");
    let identity = codec.format(17841400000000001).unwrap();

    // When
    let parsed = codec.parse(&identity);

    // Then
    assert_that!(parsed, some(eq(17841400000000001)));
}

#[test]
fn given_non_positive_id_when_formatting_then_returns_invalid_argument() {
    let codec = codec("user_{userid}");

    assert!(matches!(
        codec.format(0),
        Err(crate::PuppetError::InvalidArgument { .. })
    ));
    assert!(matches!(
        codec.format(-5),
        Err(crate::PuppetError::InvalidArgument { .. })
    ));
}

#[test]
fn given_foreign_identities_when_parsing_then_returns_none() {
    let codec = codec("user_{userid}");

    assert_that!(codec.parse("@user_42:other.org"), none());
    assert_that!(codec.parse("@alice:example.org"), none());
    assert_that!(codec.parse("@user_:example.org"), none());
    assert_that!(codec.parse("@user_042:example.org"), none());
    assert_that!(codec.parse("@user_0:example.org"), none());
    assert_that!(codec.parse("@user_-1:example.org"), none());
    assert_that!(codec.parse("user_42:example.org"), none());
    assert_that!(codec.parse("@user_42:example.org.evil"), none());
    assert_that!(codec.parse(""), none());
}

#[test]
fn given_id_overflowing_i64_when_parsing_then_returns_none() {
    let codec = codec("user_{userid}");

    assert_that!(codec.parse("@user_99999999999999999999:example.org"), none());
}

#[test]
fn given_regex_metacharacters_in_domain_when_parsing_then_treated_literally() {
    // Given: '.' must not match an arbitrary character
    let codec = codec("user_{userid}");

    // When
    let parsed = codec.parse("@user_42:exampleXorg");

    // Then
    assert_that!(parsed, none());
}

#[test]
fn given_concurrent_first_parses_when_racing_then_all_agree() {
    // Given: A codec whose pattern has not been compiled yet
    let codec = Arc::new(codec("user_{userid}"));

    // When: Many threads parse at once
    let handles: Vec<_> = (1..=8)
        .map(|id| {
            let codec = Arc::clone(&codec);
            std::thread::spawn(move || codec.parse(&format!("@user_{id}:example.org")))
        })
        .collect();

    // Then: Every thread sees the same compiled pattern
    for (id, handle) in (1..=8).zip(handles) {
        assert_that!(handle.join().unwrap(), some(eq(id)));
    }
}
