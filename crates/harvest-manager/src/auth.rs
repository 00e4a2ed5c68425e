//! Token authentication for the admin interface.
//!
//! Every parser action requires an authenticated user. Clients present the
//! user's `authentication_token` as `Authorization: Bearer <token>`.

use thiserror::Error;

use crate::db::{user_repo, Database, DatabaseError};
use crate::models::User;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing or malformed authorization header")]
    MissingCredentials,

    #[error("Invalid authentication token")]
    InvalidToken,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Resolves the current user from an `Authorization` header value.
pub fn authenticate(db: &Database, authorization: Option<&str>) -> Result<User, AuthError> {
    let token = authorization
        .and_then(bearer_token)
        .ok_or(AuthError::MissingCredentials)?;

    match user_repo::find_by_token(db, token)? {
        Some(user) => {
            tracing::debug!(user_id = %user.id, "Authenticated request");
            Ok(user)
        }
        None => {
            tracing::warn!("Rejected unknown authentication token");
            Err(AuthError::InvalidToken)
        }
    }
}
