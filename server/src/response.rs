//! Encoding of controller outcomes and errors as HTTP responses.

use axum::body::Bytes;
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde::Serialize;

use harvest_manager::{AuthError, ManagerError, Outcome};

// === Error Response ===

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Serialize)]
struct ErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: &'static str,
}

/// An error that is returned to the client as `{"error": {...}}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub error_type: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>, error_type: &'static str) -> Self {
        Self {
            status,
            message: message.into(),
            error_type,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "bad_request")
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "internal_error")
    }
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        match &err {
            ManagerError::NotFound { .. } => {
                Self::new(StatusCode::NOT_FOUND, err.to_string(), "not_found")
            }
            ManagerError::Auth(AuthError::MissingCredentials | AuthError::InvalidToken) => {
                Self::new(StatusCode::UNAUTHORIZED, err.to_string(), "unauthorized")
            }
            ManagerError::Auth(AuthError::Database(_)) | ManagerError::Database(_) => {
                tracing::error!(error = %err, "Database failure while handling request");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error",
                    "database_error",
                )
            }
            ManagerError::Config(_) => {
                tracing::error!(error = %err, "Configuration failure while handling request");
                Self::internal(err.to_string())
            }
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::from_rejection(rejection.status(), rejection.body_text())
    }
}

impl ApiError {
    fn from_rejection(status: StatusCode, message: String) -> Self {
        if status.is_server_error() {
            tracing::error!(%status, %message, "Extractor failed");
            Self::internal(message)
        } else {
            Self::new(status, message, "bad_request")
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: ErrorDetail {
                message: self.message,
                error_type: self.error_type,
            },
        });
        (self.status, body).into_response()
    }
}

// === Outcomes ===

#[derive(Debug, Serialize)]
struct RedirectBody {
    redirect_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<String>,
}

/// Renders become `200` (or `422` for a form with errors); redirects become
/// `303 See Other` with a `Location` header.
pub fn outcome_response(outcome: Outcome) -> Response {
    match outcome {
        Outcome::Render(view) => {
            let status = if view.has_errors() {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                StatusCode::OK
            };
            (status, Json(view)).into_response()
        }
        Outcome::Redirect { location, notice } => (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, location.clone())],
            Json(RedirectBody {
                redirect_to: location,
                notice,
            }),
        )
            .into_response(),
    }
}

/// Runs a blocking model call on the blocking pool.
pub async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ManagerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ApiError::internal(format!("Request task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Decodes an optional JSON body; an empty body yields `T::default()`.
pub fn json_body<T>(body: &Bytes) -> Result<T, ApiError>
where
    T: DeserializeOwned + Default,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e)))
}
