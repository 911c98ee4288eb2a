use crate::BridgeMode;

use std::str::FromStr;

#[test]
fn test_bridge_mode_from_str() {
    assert_eq!(
        BridgeMode::from_str("instagram").unwrap(),
        BridgeMode::Instagram
    );
    assert_eq!(
        BridgeMode::from_str("facebook-tor").unwrap(),
        BridgeMode::FacebookTor
    );
    assert!(BridgeMode::from_str("whatsapp").is_err());
}

#[test]
fn test_bridge_mode_network_names() {
    assert_eq!(BridgeMode::Instagram.network_name(), "instagram");
    assert_eq!(BridgeMode::Messenger.network_name(), "facebook");
    assert_eq!(BridgeMode::FacebookTor.service_name(), "facebookgo");
}

#[test]
fn test_bridge_mode_default() {
    assert_eq!(BridgeMode::default(), BridgeMode::Instagram);
    assert!(BridgeMode::default().is_instagram());
    assert!(BridgeMode::Facebook.is_messenger());
}
