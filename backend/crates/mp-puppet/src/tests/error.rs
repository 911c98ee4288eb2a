use crate::PuppetError;

use mp_db::DbError;

use std::panic::Location;

use error_location::ErrorLocation;

#[test]
fn given_binding_index_conflict_when_converted_then_already_bound_without_owner() {
    // Given
    let source = DbError::IdentityTaken {
        identity: "@alice:example.org".to_string(),
        location: ErrorLocation::from(Location::caller()),
    };

    // When
    let error = PuppetError::from(source);

    // Then
    assert!(matches!(
        error,
        PuppetError::AlreadyBound { ref identity, owner: None, .. }
            if identity == "@alice:example.org"
    ));
}

#[test]
fn given_missing_row_when_converted_then_not_found() {
    let source = DbError::PuppetNotFound {
        remote_id: 7,
        location: ErrorLocation::from(Location::caller()),
    };

    assert!(matches!(PuppetError::from(source), PuppetError::NotFound { .. }));
}
