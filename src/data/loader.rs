use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

use super::header::repair_headers;
use super::model::{mangle_duplicate_names, CellValue, Column, Table};
use crate::error::{SweepError, SweepResult};

// ---------------------------------------------------------------------------
// Source format detection
// ---------------------------------------------------------------------------

/// Formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Dispatch on the (case-insensitive) extension of a file name.
    pub fn from_file_name(name: &str) -> SweepResult<Self> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" => Ok(SourceFormat::Xlsx),
            "" => Err(SweepError::UnsupportedFormat {
                extension: "(none)".to_string(),
            }),
            other => Err(SweepError::UnsupportedFormat {
                extension: format!(".{other}"),
            }),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SourceFormat::Csv => "CSV",
            SourceFormat::Xlsx => "Excel",
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Turn an uploaded file into a [`Table`].
///
/// Detects the format from `name`, parses `bytes` with the first row as the
/// header, repairs an all-placeholder header and rejects a table without rows.
pub fn load_upload(name: &str, bytes: &[u8]) -> SweepResult<Table> {
    let format = SourceFormat::from_file_name(name)?;
    let mut table = match format {
        SourceFormat::Csv => parse_csv(bytes)?,
        SourceFormat::Xlsx => parse_xlsx(bytes)?,
    };

    if table.is_empty() {
        return Err(SweepError::EmptyTable {
            file: name.to_string(),
        });
    }

    if repair_headers(&mut table) {
        log::info!("{name}: promoted first row to column headers");
        if table.is_empty() {
            return Err(SweepError::EmptyTable {
                file: name.to_string(),
            });
        }
    }

    Ok(table)
}

/// Name given to a header cell that carries no label.
pub fn placeholder_name(idx: usize) -> String {
    format!("Unnamed: {idx}")
}

fn header_names(cells: impl Iterator<Item = String>) -> Vec<String> {
    let names = cells
        .enumerate()
        .map(|(idx, cell)| {
            let trimmed = cell.trim();
            if trimmed.is_empty() {
                placeholder_name(idx)
            } else {
                trimmed.to_string()
            }
        })
        .collect();
    mangle_duplicate_names(names)
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

/// Comma-delimited text, first record as header. Short records are padded
/// with missing values; long records are rejected.
pub fn parse_csv(bytes: &[u8]) -> SweepResult<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = header_names(reader.headers()?.iter().map(str::to_string));
    if headers.is_empty() {
        return Ok(Table::default());
    }
    let width = headers.len();

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); width];
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() > width {
            return Err(SweepError::RaggedRow {
                // 1-based, counting the header line.
                row: row_no + 2,
                expected: width,
                found: record.len(),
            });
        }
        for (col_idx, column) in raw_columns.iter_mut().enumerate() {
            column.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns.iter())
        .map(|(name, raw)| Column::from_text(name, raw))
        .collect();
    Ok(Table::new(columns))
}

// ---------------------------------------------------------------------------
// XLSX
// ---------------------------------------------------------------------------

/// First worksheet of an `.xlsx` workbook, first row of its used range as
/// header.
pub fn parse_xlsx(bytes: &[u8]) -> SweepResult<Table> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes.to_vec()))?;

    let Some(first_sheet) = workbook.sheet_names().first().cloned() else {
        return Ok(Table::default());
    };
    let range = workbook.worksheet_range(&first_sheet)?;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Table::default());
    };
    let headers = header_names(header_row.iter().map(header_cell_text));
    let width = headers.len();

    let mut cells: Vec<Vec<CellValue>> = vec![Vec::new(); width];
    for row in rows {
        for (col_idx, column) in cells.iter_mut().enumerate() {
            let cell = row.get(col_idx).unwrap_or(&Data::Empty);
            column.push(convert_cell(cell));
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Column::from_cells(name, values))
        .collect();
    Ok(Table::new(columns))
}

fn header_cell_text(c: &Data) -> String {
    match c {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 => (*f as i64).to_string(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn convert_cell(c: &Data) -> CellValue {
    match c {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if f.is_nan() => CellValue::Null,
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        // Dates, durations and error cells are carried as text.
        other => CellValue::Text(other.to_string()),
    }
}
