//! Axum route handlers for dataset upload and preview.

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::dataset::models::TableSample;
use crate::dataset::{excel, sampler, SampleError};
use crate::errors::AppError;
use crate::session::SessionPhase;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadedTable {
    pub name: String,
    pub rows_sampled: usize,
}

#[derive(Debug, Serialize)]
pub struct UploadDatasetsResponse {
    pub session_id: Uuid,
    pub tables: Vec<UploadedTable>,
    /// One entry per skipped file. A malformed file never fails the upload.
    pub warnings: Vec<String>,
    pub phase: SessionPhase,
}

#[derive(Debug, Serialize)]
pub struct PreviewDatasetsResponse {
    pub session_id: Uuid,
    pub tables: Vec<TableSample>,
}

/// POST /api/v1/sessions/:id/datasets
///
/// Multipart upload of CSV/xlsx files. Every parsed table is sampled and
/// appended to the session's upload set; the digest is recomputed from the
/// full set and the session moves to DataLoaded.
pub async fn handle_upload_datasets(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadDatasetsResponse>, AppError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    let mut samples: Vec<TableSample> = Vec::new();
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

        match sample_file(&filename, &bytes) {
            Ok(mut file_samples) => samples.append(&mut file_samples),
            Err(e) => {
                warn!("Skipping '{}': {}", filename, e);
                warnings.push(format!("{filename}: {e}"));
            }
        }
    }

    if samples.is_empty() && warnings.is_empty() {
        return Err(AppError::Validation(
            "Upload contained no files".to_string(),
        ));
    }

    let tables: Vec<UploadedTable> = samples
        .iter()
        .map(|s| UploadedTable {
            name: s.name.clone(),
            rows_sampled: s.rows.len(),
        })
        .collect();

    let phase = session.add_samples(samples);
    info!(
        "Session {}: {} tables sampled, {} files skipped",
        session_id,
        tables.len(),
        warnings.len()
    );

    Ok(Json(UploadDatasetsResponse {
        session_id,
        tables,
        warnings,
        phase,
    }))
}

/// GET /api/v1/sessions/:id/datasets
///
/// Returns the stored samples (header + rows) for display.
pub async fn handle_preview_datasets(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PreviewDatasetsResponse>, AppError> {
    let session = state
        .sessions
        .get(&session_id)
        .ok_or_else(|| AppError::NotFound(format!("Session {session_id} not found")))?;

    Ok(Json(PreviewDatasetsResponse {
        session_id,
        tables: session.samples(),
    }))
}

/// Routes one uploaded file to the matching sampler by extension.
fn sample_file(filename: &str, bytes: &[u8]) -> Result<Vec<TableSample>, SampleError> {
    let lower = filename.to_ascii_lowercase();
    if lower.ends_with(".csv") {
        Ok(vec![sampler::sample_csv(filename, bytes)?])
    } else if lower.ends_with(".xlsx") {
        excel::sample_workbook(filename, bytes)
    } else {
        Err(SampleError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_file_routes_by_extension() {
        let csv = sample_file("Sales.CSV", b"id\n1\n").unwrap();
        assert_eq!(csv.len(), 1);
        assert_eq!(csv[0].name, "Sales.CSV");

        assert!(matches!(
            sample_file("report.pdf", b"%PDF-"),
            Err(SampleError::Unsupported)
        ));
    }
}
