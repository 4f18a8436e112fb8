pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::dataset::handlers as dataset;
use crate::session::handlers as session;
use crate::state::AppState;
use crate::tasks::handlers as tasks;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Session lifecycle
        .route("/api/v1/sessions", post(session::handle_create_session))
        .route("/api/v1/sessions/:id", get(session::handle_get_session))
        .route(
            "/api/v1/sessions/:id/cache/clear",
            post(session::handle_clear_cache),
        )
        // Dataset upload and preview
        .route(
            "/api/v1/sessions/:id/datasets",
            post(dataset::handle_upload_datasets).get(dataset::handle_preview_datasets),
        )
        // Technical-flow source code upload
        .route(
            "/api/v1/sessions/:id/sources",
            post(tasks::handle_upload_sources),
        )
        // Content generation
        .route(
            "/api/v1/sessions/:id/generate",
            post(tasks::handle_generate),
        )
        .with_state(state)
}
