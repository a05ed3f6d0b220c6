//! Seam to the external spreadsheet decoder. Everything downstream works on
//! positional rows of `calamine::Data`; this module is the only place that
//! knows the bytes were ever an XLSX workbook.

use std::io::Cursor;

use bytes::Bytes;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

use crate::error::AppError;

#[derive(Debug)]
pub struct SheetRows {
    pub name: String,
    pub rows: Vec<Vec<Data>>,
}

/// Decodes a workbook into per-sheet row sets. Unreadable or empty sheets
/// are skipped with a warning; only a workbook that cannot be opened at all
/// is an error.
pub fn decode_workbook(file_data: Bytes) -> Result<Vec<SheetRows>, AppError> {
    let cursor = Cursor::new(file_data);

    let mut workbook: Xlsx<_> = open_workbook_from_rs(cursor)
        .map_err(|e| AppError::FileProcessing(format!("Failed to open Excel file: {}", e)))?;

    let sheet_names = workbook.sheet_names().to_vec();
    tracing::info!("Decoding {} sheets", sheet_names.len());

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for sheet_name in &sheet_names {
        match workbook.worksheet_range(sheet_name) {
            Ok(range) => {
                let rows: Vec<Vec<Data>> = range.rows().map(|row| row.to_vec()).collect();

                if rows.is_empty() {
                    tracing::warn!("Sheet {} is empty, skipping", sheet_name);
                    continue;
                }

                sheets.push(SheetRows {
                    name: sheet_name.clone(),
                    rows,
                });
            }
            Err(e) => {
                tracing::warn!("Failed to read worksheet {}: {}", sheet_name, e);
                continue;
            }
        }
    }

    Ok(sheets)
}

/// Non-empty trimmed text of a positional cell, if the cell exists and
/// holds something presentable.
pub fn cell_text(row: &[Data], idx: usize) -> Option<String> {
    match row.get(idx)? {
        Data::Empty | Data::Error(_) => None,
        value => {
            let text = value.to_string();
            let trimmed = text.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
    }
}

/// Non-negative integer reading of a positional cell.
pub fn cell_u64(row: &[Data], idx: usize) -> Option<u64> {
    match row.get(idx)? {
        Data::Int(i) if *i >= 0 => Some(*i as u64),
        Data::Float(f) if *f >= 0.0 => Some(*f as u64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_text_skips_empty_and_blank() {
        let row = vec![
            Data::String("Logo design".to_string()),
            Data::Empty,
            Data::String("   ".to_string()),
            Data::Float(4.9),
        ];
        assert_eq!(cell_text(&row, 0).as_deref(), Some("Logo design"));
        assert_eq!(cell_text(&row, 1), None);
        assert_eq!(cell_text(&row, 2), None);
        assert_eq!(cell_text(&row, 3).as_deref(), Some("4.9"));
        assert_eq!(cell_text(&row, 9), None);
    }

    #[test]
    fn cell_u64_reads_numeric_shapes() {
        let row = vec![
            Data::Int(42),
            Data::Float(7.0),
            Data::String("19".to_string()),
            Data::Int(-3),
            Data::String("many".to_string()),
        ];
        assert_eq!(cell_u64(&row, 0), Some(42));
        assert_eq!(cell_u64(&row, 1), Some(7));
        assert_eq!(cell_u64(&row, 2), Some(19));
        assert_eq!(cell_u64(&row, 3), None);
        assert_eq!(cell_u64(&row, 4), None);
        assert_eq!(cell_u64(&row, 9), None);
    }
}
