//! Axum route handlers for the generate flow and source-code upload.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::dataset::models::SourceFile;
use crate::errors::AppError;
use crate::llm_client::prompts::METATAG_SYSTEM_PROMPT;
use crate::responder::{respond, PromptRequest};
use crate::session::SessionPhase;
use crate::state::AppState;
use crate::tasks::{
    business_prompt, initial_analysis_prompt, questions_for, technical_prompt, ViewKind,
};

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub view: ViewKind,
}

/// One expandable result panel: the task id, the question it answers and the
/// model's response.
#[derive(Debug, Serialize)]
pub struct GeneratedPanel {
    pub task: &'static str,
    pub instruction: &'static str,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub session_id: Uuid,
    pub view: ViewKind,
    /// Present for the business view only; the shared context its panels
    /// were derived from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_analysis: Option<String>,
    pub panels: Vec<GeneratedPanel>,
    pub phase: SessionPhase,
}

#[derive(Debug, Serialize)]
pub struct UploadSourcesResponse {
    pub session_id: Uuid,
    pub files: Vec<String>,
    pub warnings: Vec<String>,
}

/// POST /api/v1/sessions/:id/generate
///
/// Runs the selected view's task questions strictly in order, one completion
/// at a time, each through the session's response cache. Repeating the call
/// with unchanged inputs is served entirely from cache.
pub async fn handle_generate(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;
    let backend = state.backend.as_ref();
    let model = session.model;

    // Per-view shared context. Business derives an initial analysis from the
    // digest; technical uses the uploaded source files directly.
    let (initial_analysis, sources) = match request.view {
        ViewKind::Business => {
            if session.phase() == SessionPhase::Idle {
                return Err(AppError::Validation(
                    "No dataset loaded. Upload tables before generating business content."
                        .to_string(),
                ));
            }
            let prompt = initial_analysis_prompt(session.table_count(), &session.digest());
            let analysis = respond(
                backend,
                &session.cache,
                &PromptRequest {
                    system: METATAG_SYSTEM_PROMPT.to_string(),
                    user: prompt,
                    model,
                },
            )
            .await?;
            (Some(analysis), Vec::new())
        }
        ViewKind::Technical => {
            let sources = session.sources();
            if sources.is_empty() {
                return Err(AppError::Validation(
                    "No source files uploaded. Upload ETL code before generating technical content."
                        .to_string(),
                ));
            }
            (None, sources)
        }
    };

    let mut panels = Vec::new();
    for question in questions_for(request.view) {
        let user = match request.view {
            ViewKind::Business => business_prompt(
                initial_analysis.as_deref().unwrap_or_default(),
                question.instruction,
            ),
            ViewKind::Technical => technical_prompt(&sources, question.instruction),
        };
        let content = respond(
            backend,
            &session.cache,
            &PromptRequest {
                system: METATAG_SYSTEM_PROMPT.to_string(),
                user,
                model,
            },
        )
        .await?;
        panels.push(GeneratedPanel {
            task: question.task,
            instruction: question.instruction,
            content,
        });
    }

    let phase = session.mark_generated();
    info!(
        "Session {}: generated {} {:?} panels",
        session_id,
        panels.len(),
        request.view
    );

    Ok(Json(GenerateResponse {
        session_id,
        view: request.view,
        initial_analysis,
        panels,
        phase,
    }))
}

/// POST /api/v1/sessions/:id/sources
///
/// Multipart upload of ETL source files for the technical flow. Files are
/// kept verbatim as prompt context; non-UTF-8 parts are skipped with a
/// warning.
pub async fn handle_upload_sources(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadSourcesResponse>, AppError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let mut files: Vec<SourceFile> = Vec::new();
    let mut warnings = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {e}")))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            warnings.push("skipped a part with no filename".to_string());
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read '{filename}': {e}")))?;

        match String::from_utf8(bytes.to_vec()) {
            Ok(contents) => files.push(SourceFile {
                name: filename,
                contents,
            }),
            Err(_) => {
                warn!("Skipping '{}': not valid UTF-8", filename);
                warnings.push(format!("{filename}: not valid UTF-8 text"));
            }
        }
    }

    if files.is_empty() && warnings.is_empty() {
        return Err(AppError::Validation(
            "Upload contained no files".to_string(),
        ));
    }

    let names: Vec<String> = files.iter().map(|f| f.name.clone()).collect();
    session.add_sources(files);
    info!(
        "Session {}: {} source files uploaded, {} skipped",
        session_id,
        names.len(),
        warnings.len()
    );

    Ok(Json(UploadSourcesResponse {
        session_id,
        files: names,
        warnings,
    }))
}
