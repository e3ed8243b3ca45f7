use rust_xlsxwriter::Workbook;

use super::model::{CellValue, Table};
use super::naming::split_extension;
use crate::error::{SweepError, SweepResult};

// ---------------------------------------------------------------------------
// Target formats
// ---------------------------------------------------------------------------

/// Formats a table can be converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Excel,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 2] = [ExportFormat::Csv, ExportFormat::Excel];

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Excel => "Excel",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Excel => "xlsx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Csv => "text/csv",
            ExportFormat::Excel => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
        }
    }
}

/// A converted file ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    pub format: ExportFormat,
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Swap the final extension of `source` for the target format's.
pub fn suggest_file_name(source: &str, format: ExportFormat) -> String {
    let (stem, _) = split_extension(source);
    format!("{stem}.{}", format.extension())
}

// ---------------------------------------------------------------------------
// Serialisation
// ---------------------------------------------------------------------------

/// Serialise `table` as header row plus data rows, without an index column.
pub fn export_table(table: &Table, format: ExportFormat) -> SweepResult<Vec<u8>> {
    match format {
        ExportFormat::Csv => write_csv(table),
        ExportFormat::Excel => write_xlsx(table),
    }
}

fn write_csv(table: &Table) -> SweepResult<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in 0..table.row_count() {
        writer.write_record(table.columns.iter().map(|c| c.values[row].to_field()))?;
    }
    writer
        .into_inner()
        .map_err(|e| SweepError::Io(e.into_error()))
}

/// Largest sheet an `.xlsx` worksheet can hold (rows include the header).
const MAX_SHEET_ROWS: usize = 1_048_576;
const MAX_SHEET_COLS: usize = 16_384;

fn write_xlsx(table: &Table) -> SweepResult<Vec<u8>> {
    if table.row_count() + 1 > MAX_SHEET_ROWS {
        return Err(SweepError::SheetTooLarge(format!(
            "{} rows exceeds the limit of {}",
            table.row_count(),
            MAX_SHEET_ROWS - 1
        )));
    }
    if table.column_count() > MAX_SHEET_COLS {
        return Err(SweepError::SheetTooLarge(format!(
            "{} columns exceeds the limit of {MAX_SHEET_COLS}",
            table.column_count()
        )));
    }

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("Sheet1")?;

    // Bounds were checked above, so the casts below cannot truncate.
    for (col_idx, column) in table.columns.iter().enumerate() {
        let col = col_idx as u16;
        sheet.write_string(0, col, &column.name)?;
        for (row_idx, value) in column.values.iter().enumerate() {
            let row = row_idx as u32 + 1;
            match value {
                CellValue::Null => {}
                CellValue::Integer(i) => {
                    sheet.write_number(row, col, *i as f64)?;
                }
                CellValue::Float(f) => {
                    sheet.write_number(row, col, *f)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                CellValue::Text(s) => {
                    sheet.write_string(row, col, s)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::{load_upload, parse_csv};
    use crate::data::model::ColumnKind;

    #[test]
    fn csv_export_has_header_and_no_index() {
        let table = parse_csv(b"a,b\n1,\n2,4\n").unwrap();
        let bytes = export_table(&table, ExportFormat::Csv).unwrap();
        assert_eq!(String::from_utf8(bytes).unwrap(), "a,b\n1,\n2,4.0\n");
    }

    #[test]
    fn csv_round_trip_keeps_names_and_values() {
        let table = parse_csv(b"id,name,score,ok\n1,Ada,98.5,true\n2,Grace,,false\n3,Linus,70,true\n").unwrap();
        let bytes = export_table(&table, ExportFormat::Csv).unwrap();
        let back = load_upload("out.csv", &bytes).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn xlsx_round_trip_keeps_names_and_values() {
        let table = parse_csv(b"id,name,score\n1,Ada,98.5\n2,Grace,\n").unwrap();
        let bytes = export_table(&table, ExportFormat::Excel).unwrap();
        let back = load_upload("out.xlsx", &bytes).unwrap();
        assert_eq!(back.column_names(), table.column_names());
        assert_eq!(back.columns[0].kind, ColumnKind::Integer);
        assert_eq!(back.columns[1], table.columns[1]);
        assert_eq!(back.columns[2], table.columns[2]);
    }

    #[test]
    fn suggested_names_swap_only_the_final_extension() {
        assert_eq!(suggest_file_name("sales.csv", ExportFormat::Excel), "sales.xlsx");
        assert_eq!(suggest_file_name("csv.report.xlsx", ExportFormat::Csv), "csv.report.csv");
        assert_eq!(suggest_file_name("data.xlsx", ExportFormat::Excel), "data.xlsx");
    }

    #[test]
    fn mime_types() {
        assert_eq!(ExportFormat::Csv.mime_type(), "text/csv");
        assert_eq!(
            ExportFormat::Excel.mime_type(),
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
        );
    }
}
