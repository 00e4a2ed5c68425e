use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::ValidationErrors;

/// An administrator of the harvest manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub authentication_token: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds an unsaved user with a freshly generated token.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            email: email.into(),
            authentication_token: generate_token(),
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        if self.name.trim().is_empty() {
            errors.add("name", "can't be blank");
        }
        if !self.email.contains('@') {
            errors.add("email", "is invalid");
        }
        errors
    }
}

fn generate_token() -> String {
    Uuid::new_v4().simple().to_string()
}
