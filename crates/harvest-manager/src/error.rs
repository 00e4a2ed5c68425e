use std::path::PathBuf;
use thiserror::Error;

use crate::auth::AuthError;
use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },
}

impl ManagerError {
    pub fn parser_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "Parser",
            id: id.into(),
        }
    }

    pub fn harvest_job_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: "HarvestJob",
            id: id.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Invalid value for environment variable '{name}': {reason}")]
    InvalidEnv { name: String, reason: String },

    #[error("Config validation failed: {message}")]
    Validation { message: String },
}

pub type Result<T> = std::result::Result<T, ManagerError>;
