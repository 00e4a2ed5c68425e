use thiserror::Error;

use harvest_manager::{ConfigError, DatabaseError};

/// Failures while starting or running the server and CLI.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Failed to initialize logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),

    #[error("Invalid listen address '{addr}': {source}")]
    InvalidAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("User not created: {0}")]
    InvalidUser(String),

    #[error("No database path configured and no home directory to default to")]
    NoDatabasePath,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
