//! `/parsers` handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;

use harvest_manager::{ParserAttributes, ParsersController};

use crate::extract::{ApiPath, ApiQuery, CurrentUser};
use crate::response::{blocking, json_body, outcome_response, ApiError};
use crate::state::AppState;

/// Request body: `{"parser": {...}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ParserParams {
    pub parser: Option<ParserAttributes>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AllowFlushParams {
    pub allow: Option<bool>,
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
    let db = state.db.clone();
    let outcome = blocking(move || ParsersController::new(&db, &user).index()).await?;
    Ok(outcome_response(outcome))
}

pub async fn show(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ApiError> {
    let db = state.db.clone();
    let outcome = blocking(move || ParsersController::new(&db, &user).show(&id)).await?;
    Ok(outcome_response(outcome))
}

pub async fn new_form(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> Response {
    outcome_response(ParsersController::new(&state.db, &user).new_form())
}

pub async fn edit(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ApiError> {
    let db = state.db.clone();
    let outcome = blocking(move || ParsersController::new(&db, &user).edit(&id)).await?;
    Ok(outcome_response(outcome))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params: ParserParams = json_body(&body)?;
    let attributes = params.parser.unwrap_or_default();
    let db = state.db.clone();
    let outcome = blocking(move || ParsersController::new(&db, &user).create(attributes)).await?;
    Ok(outcome_response(outcome))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params: ParserParams = json_body(&body)?;
    let db = state.db.clone();
    let outcome =
        blocking(move || ParsersController::new(&db, &user).update(&id, params.parser)).await?;
    Ok(outcome_response(outcome))
}

pub async fn destroy(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ApiError> {
    let db = state.db.clone();
    let outcome = blocking(move || ParsersController::new(&db, &user).destroy(&id)).await?;
    Ok(outcome_response(outcome))
}

pub async fn allow_flush(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
    ApiQuery(params): ApiQuery<AllowFlushParams>,
) -> Result<Response, ApiError> {
    let db = state.db.clone();
    let outcome =
        blocking(move || ParsersController::new(&db, &user).allow_flush(&id, params.allow))
            .await?;
    Ok(outcome_response(outcome))
}
