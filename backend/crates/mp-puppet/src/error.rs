use mp_db::DbError;

use std::panic::Location;

use error_location::ErrorLocation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PuppetError {
    /// Caller passed an identifier that can never be valid
    #[error("Invalid argument: {message} {location}")]
    InvalidArgument {
        message: String,
        location: ErrorLocation,
    },

    #[error("Not found: {message} {location}")]
    NotFound {
        message: String,
        location: ErrorLocation,
    },

    /// `owner` is `None` when only the store's unique index caught it
    #[error("{identity} is already bound to another puppet {location}")]
    AlreadyBound {
        identity: String,
        owner: Option<i64>,
        location: ErrorLocation,
    },

    #[error("Remote fetch failed: {message} {location}")]
    RemoteFetch {
        message: String,
        location: ErrorLocation,
    },

    #[error("Local profile write failed: {message} {location}")]
    LocalWrite {
        message: String,
        location: ErrorLocation,
    },

    #[error("Persistence failed: {message} {location}")]
    Persistence {
        message: String,
        location: ErrorLocation,
    },
}

impl PuppetError {
    #[track_caller]
    pub fn invalid_argument<S: Into<String>>(message: S) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn already_bound<S: Into<String>>(identity: S, owner: Option<i64>) -> Self {
        Self::AlreadyBound {
            identity: identity.into(),
            owner,
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn remote_fetch<S: Into<String>>(message: S) -> Self {
        Self::RemoteFetch {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn local_write<S: Into<String>>(message: S) -> Self {
        Self::LocalWrite {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }

    #[track_caller]
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Self::Persistence {
            message: message.into(),
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<DbError> for PuppetError {
    #[track_caller]
    fn from(source: DbError) -> Self {
        match source {
            DbError::PuppetNotFound { .. } => Self::not_found(source.to_string()),
            DbError::IdentityTaken { identity, .. } => Self::already_bound(identity, None),
            _ => Self::persistence(source.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, PuppetError>;
