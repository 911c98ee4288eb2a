use mp_core::ErrorLocation;

use std::panic::Location;

use sqlx::migrate::MigrateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLx error: {source} {location}")]
    Sqlx {
        source: sqlx::Error,
        location: ErrorLocation,
    },

    #[error("Schema migration failed: {source} {location}")]
    Migration {
        source: MigrateError,
        location: ErrorLocation,
    },

    #[error("Failed to open puppet database: {message} {location}")]
    Initialization {
        message: String,
        location: ErrorLocation,
    },

    /// A second puppet tried to claim a bound local identity
    #[error("{identity} is already bound to another puppet {location}")]
    IdentityTaken {
        identity: String,
        location: ErrorLocation,
    },

    #[error("Puppet {remote_id} is not stored {location}")]
    PuppetNotFound {
        remote_id: i64,
        location: ErrorLocation,
    },
}

impl DbError {
    /// Translate a write failure, recognizing the unique binding index.
    #[track_caller]
    pub(crate) fn from_write(source: sqlx::Error, identity: Option<&str>) -> Self {
        let binding_conflict = source.as_database_error().is_some_and(|e| {
            e.is_unique_violation() && e.message().contains("custom_mxid")
        });

        match identity {
            Some(identity) if binding_conflict => Self::IdentityTaken {
                identity: identity.to_string(),
                location: ErrorLocation::from(Location::caller()),
            },
            _ => Self::from(source),
        }
    }
}

impl From<sqlx::Error> for DbError {
    #[track_caller]
    fn from(source: sqlx::Error) -> Self {
        Self::Sqlx {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

impl From<MigrateError> for DbError {
    #[track_caller]
    fn from(source: MigrateError) -> Self {
        Self::Migration {
            source,
            location: ErrorLocation::from(Location::caller()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;
