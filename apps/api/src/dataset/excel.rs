//! Excel workbook sampling.
//!
//! Each uploaded workbook is opened explicitly from its bytes and every
//! sheet is iterated as an independent table sample, keyed by sheet name.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use super::models::TableSample;
use super::sampler::{is_complete, MAX_SAMPLE_ROWS};
use super::SampleError;

/// Samples every non-empty sheet of an xlsx workbook.
pub fn sample_workbook(name: &str, bytes: &[u8]) -> Result<Vec<TableSample>, SampleError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))
        .map_err(|e| SampleError::Workbook(format!("failed to open '{name}': {e}")))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let mut samples = Vec::new();

    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| SampleError::Workbook(format!("failed to read sheet '{sheet_name}': {e}")))?;

        let mut range_rows = range.rows();
        let Some(header_row) = range_rows.next() else {
            continue; // empty sheet
        };
        let header: Vec<String> = header_row.iter().map(cell_to_string).collect();
        if header.iter().all(|h| h.trim().is_empty()) {
            continue;
        }

        let mut rows = Vec::new();
        for row in range_rows {
            let cells: Vec<String> = row.iter().map(cell_to_string).collect();
            if !is_complete(&cells, header.len()) {
                continue;
            }
            rows.push(cells);
            if rows.len() == MAX_SAMPLE_ROWS {
                break;
            }
        }

        samples.push(TableSample {
            name: sheet_name.clone(),
            header,
            rows,
        });
    }

    if samples.is_empty() {
        return Err(SampleError::Empty);
    }
    Ok(samples)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    /// Builds an in-memory workbook: each sheet is (name, rows-of-cells).
    fn workbook_bytes(sheets: &[(&str, Vec<Vec<&str>>)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        for (name, rows) in sheets {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(*name).unwrap();
            for (r, row) in rows.iter().enumerate() {
                for (c, cell) in row.iter().enumerate() {
                    if !cell.is_empty() {
                        worksheet.write_string(r as u32, c as u16, *cell).unwrap();
                    }
                }
            }
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_each_sheet_becomes_its_own_sample() {
        let bytes = workbook_bytes(&[
            ("orders", vec![vec!["id", "total"], vec!["1", "9.99"]]),
            ("customers", vec![vec!["id", "name"], vec!["1", "Ada"]]),
        ]);
        let samples = sample_workbook("data.xlsx", &bytes).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].name, "orders");
        assert_eq!(samples[1].name, "customers");
        assert_eq!(samples[1].rows, vec![vec!["1", "Ada"]]);
    }

    #[test]
    fn test_sheet_sampling_applies_the_row_policy() {
        let mut rows = vec![vec!["id", "val"]];
        let owned: Vec<String> = (0..8).map(|i| i.to_string()).collect();
        for i in &owned {
            rows.push(vec![i.as_str(), "x"]);
        }
        rows.insert(2, vec!["gap", ""]); // blank cell row, dropped by the policy
        let bytes = workbook_bytes(&[("sheet1", rows)]);

        let samples = sample_workbook("data.xlsx", &bytes).unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].rows.len(), MAX_SAMPLE_ROWS);
        assert!(samples[0].rows.iter().all(|r| r[0] != "gap"));
    }

    #[test]
    fn test_garbage_bytes_are_a_workbook_error() {
        assert!(matches!(
            sample_workbook("junk.xlsx", b"not a zip archive"),
            Err(SampleError::Workbook(_))
        ));
    }
}
