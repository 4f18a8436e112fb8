//! CSV sampling and digest construction.
//!
//! Row policy (one policy everywhere, including preview): drop rows with a
//! missing value (an empty cell, or fewer cells than the header), then take
//! the first [`MAX_SAMPLE_ROWS`] that remain.

use super::models::TableSample;
use super::SampleError;

/// Data rows kept per table, after the row policy.
pub const MAX_SAMPLE_ROWS: usize = 5;

/// A row qualifies for sampling only when it is exactly as wide as the
/// header and has no blank cells.
pub(crate) fn is_complete(cells: &[String], width: usize) -> bool {
    cells.len() == width && cells.iter().all(|c| !c.trim().is_empty())
}

/// Parses CSV bytes into a [`TableSample`] named after the uploaded file.
pub fn sample_csv(name: &str, bytes: &[u8]) -> Result<TableSample, SampleError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(bytes);

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if header.iter().all(|h| h.trim().is_empty()) {
        return Err(SampleError::Empty);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let cells: Vec<String> = record.iter().map(str::to_string).collect();
        if !is_complete(&cells, header.len()) {
            continue;
        }
        rows.push(cells);
        if rows.len() == MAX_SAMPLE_ROWS {
            break;
        }
    }

    Ok(TableSample {
        name: name.to_string(),
        header,
        rows,
    })
}

/// Serializes every sample, in upload order, into the digest string used as
/// shared prompt context. Pure; an empty slice yields an empty digest.
pub fn build_digest(samples: &[TableSample]) -> String {
    let mut digest = String::new();
    for sample in samples {
        digest.push_str("Table: ");
        digest.push_str(&sample.name);
        digest.push('\n');
        digest.push_str(&sample.header.join(","));
        digest.push('\n');
        for row in &sample.rows {
            digest.push_str(&row.join(","));
            digest.push('\n');
        }
        digest.push('\n');
    }
    digest
}
