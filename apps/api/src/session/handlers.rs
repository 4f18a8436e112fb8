//! Axum route handlers for session lifecycle and cache control.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::SupportedModel;
use crate::session::SessionView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    /// Model label for every completion in this session. Defaults to the
    /// current balanced model. Placeholder labels are accepted here and
    /// rejected at generation time, before any remote call.
    #[serde(default)]
    pub model: SupportedModel,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub session_id: Uuid,
    pub cleared_entries: usize,
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<SessionView>, AppError> {
    let session = state.sessions.create(request.model);
    info!("Created session {} (model: {})", session.id, session.model);
    Ok(Json(session.view()))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    Ok(Json(session.view()))
}

/// POST /api/v1/sessions/:id/cache/clear
///
/// Full clear of the session's response cache — the only supported eviction.
pub async fn handle_clear_cache(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<ClearCacheResponse>, AppError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let cleared_entries = session.cache.len();
    session.cache.clear();
    info!("Session {session_id}: cleared {cleared_entries} cached responses");

    Ok(Json(ClearCacheResponse {
        session_id,
        cleared_entries,
    }))
}
