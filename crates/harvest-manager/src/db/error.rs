//! Storage errors.

use std::path::PathBuf;

use rusqlite::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[source] rusqlite::Error),

    /// A write was rejected by a UNIQUE, NOT NULL or FOREIGN KEY constraint.
    /// `message` is SQLite's text, e.g. `UNIQUE constraint failed: parsers.name`.
    #[error("Constraint violation: {message}")]
    Constraint { message: String },

    #[error("Cannot create database directory '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema migration v{version} ({description}) failed: {reason}")]
    Migration {
        version: u32,
        description: &'static str,
        reason: String,
    },

    #[error("Database lock poisoned")]
    LockPoisoned,
}

impl DatabaseError {
    /// Whether the error is a constraint violation naming `table.column`.
    pub fn violates(&self, table: &str, column: &str) -> bool {
        match self {
            DatabaseError::Constraint { message } => {
                message.contains(&format!("{}.{}", table, column))
            }
            _ => false,
        }
    }
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, message)
                if failure.code == ErrorCode::ConstraintViolation =>
            {
                DatabaseError::Constraint {
                    message: message.unwrap_or_else(|| failure.to_string()),
                }
            }
            other => DatabaseError::Sqlite(other),
        }
    }
}
