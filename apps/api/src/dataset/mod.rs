//! Dataset ingestion — uploaded CSV/Excel files are reduced to small
//! per-table samples, and the samples to a single digest string that serves
//! as shared context for every downstream prompt.

use thiserror::Error;

pub mod excel;
pub mod handlers;
pub mod models;
pub mod sampler;

/// Per-file sampling failure. Local to the offending file — the upload
/// handler skips the file and surfaces a warning instead of failing the
/// session.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("CSV decode error: {0}")]
    Csv(#[from] csv::Error),

    #[error("workbook error: {0}")]
    Workbook(String),

    #[error("unsupported file type (expected .csv or .xlsx)")]
    Unsupported,

    #[error("file contains no tabular data")]
    Empty,
}
