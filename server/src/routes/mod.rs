//! Route table.

pub mod harvest_jobs;
pub mod parsers;

use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;

use crate::state::AppState;

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/parsers", get(parsers::index).post(parsers::create))
        .route("/parsers/new", get(parsers::new_form))
        .route(
            "/parsers/{id}",
            get(parsers::show)
                .put(parsers::update)
                .delete(parsers::destroy),
        )
        .route("/parsers/{id}/edit", get(parsers::edit))
        .route("/parsers/{id}/allow_flush", get(parsers::allow_flush))
        .route(
            "/parsers/{id}/harvest_jobs",
            get(harvest_jobs::index).post(harvest_jobs::create),
        )
        .route("/harvest_jobs/{id}/stop", put(harvest_jobs::stop))
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}
