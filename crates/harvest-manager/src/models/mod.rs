//! Domain models: parsers, the harvest jobs derived from them, and the
//! users that drive the admin interface.

pub mod harvest_job;
pub mod parser;
pub mod user;

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

pub use harvest_job::{Environment, HarvestJob, HarvestJobAttributes, HarvestMode, JobStatus};
pub use parser::{DataType, Parser, ParserAttributes};
pub use user::User;

/// Field-keyed validation messages, serialized as `{"field": ["message", ..]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn on(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Folds `other` into `self`, keeping messages in insertion order.
    pub fn merge(&mut self, other: ValidationErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }
}

/// Raised when a stored or submitted enum label is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

/// Outcome of persisting a model.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("Validation failed")]
    Invalid(ValidationErrors),

    #[error(transparent)]
    Database(#[from] crate::db::DatabaseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_collect_by_field() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());

        errors.add("name", "can't be blank");
        errors.add("name", "is too short");
        errors.add("strategy", "can't be blank");

        assert!(!errors.is_empty());
        assert_eq!(errors.on("name").len(), 2);
        assert_eq!(errors.on("content"), &[] as &[String]);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["strategy"][0], "can't be blank");
    }

    #[test]
    fn test_validation_errors_merge() {
        let mut a = ValidationErrors::new();
        a.add("name", "can't be blank");
        let mut b = ValidationErrors::new();
        b.add("name", "has already been taken");
        b.add("limit", "must be greater than 0");

        a.merge(b);
        assert_eq!(a.on("name"), ["can't be blank", "has already been taken"]);
        assert_eq!(a.on("limit").len(), 1);
    }
}
