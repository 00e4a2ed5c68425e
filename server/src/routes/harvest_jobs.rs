//! Harvest job handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::Response;
use serde::Deserialize;

use harvest_manager::models::HarvestJobAttributes;
use harvest_manager::HarvestJobsController;

use crate::extract::{ApiPath, CurrentUser};
use crate::response::{blocking, json_body, outcome_response, ApiError};
use crate::state::AppState;

/// Request body: `{"harvest_job": {...}}`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HarvestJobParams {
    pub harvest_job: Option<HarvestJobAttributes>,
}

pub async fn index(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(parser_id): ApiPath<String>,
) -> Result<Response, ApiError> {
    let db = state.db.clone();
    let outcome =
        blocking(move || HarvestJobsController::new(&db, &user).index(&parser_id)).await?;
    Ok(outcome_response(outcome))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(parser_id): ApiPath<String>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let params: HarvestJobParams = json_body(&body)?;
    let attributes = params.harvest_job.unwrap_or_default();
    let db = state.db.clone();
    let outcome = blocking(move || {
        HarvestJobsController::new(&db, &user).create(&parser_id, attributes)
    })
    .await?;
    Ok(outcome_response(outcome))
}

pub async fn stop(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<String>,
) -> Result<Response, ApiError> {
    let db = state.db.clone();
    let outcome = blocking(move || HarvestJobsController::new(&db, &user).stop(&id)).await?;
    Ok(outcome_response(outcome))
}
