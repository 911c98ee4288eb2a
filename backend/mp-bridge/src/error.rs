use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Config error: {0}")]
    Config(#[from] mp_config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] mp_db::DbError),

    #[error("Puppet error: {0}")]
    Puppet(#[from] mp_puppet::PuppetError),

    #[error("Failed to create log directory {path}: {source}")]
    LogDir {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Logger error: {message}")]
    Logger { message: String },

    #[error("{identity} is not a puppet identity")]
    NotAPuppet { identity: String },

    #[error("Puppet {remote_id} does not exist")]
    UnknownPuppet { remote_id: i64 },

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
