use serde::{Deserialize, Serialize};

/// An immutable sample of one uploaded table: header plus at most
/// [`crate::dataset::sampler::MAX_SAMPLE_ROWS`] data rows that survived the
/// row policy. Named by the uploaded filename for CSV and by the sheet name
/// for Excel sheets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSample {
    pub name: String,
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// An uploaded ETL source file for the technical flow. Kept verbatim — the
/// whole file is prompt context, not sampled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub name: String,
    pub contents: String,
}
