use crate::data::chart::{numeric_series, Series};
use crate::data::clean::{fill_missing_with_mean, remove_duplicates};
use crate::data::export::{export_table, suggest_file_name, ExportArtifact, ExportFormat};
use crate::data::loader::{load_upload, SourceFormat};
use crate::data::model::{format_float, Table};
use crate::data::naming::UniqueNames;
use crate::data::projection::project;
use crate::error::{SweepError, SweepResult};

// ---------------------------------------------------------------------------
// Compiled-in configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    /// Rows shown in each file preview.
    pub preview_rows: usize,
    pub chart_height: f32,
    pub window_size: [f32; 2],
    pub min_window_size: [f32; 2],
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            chart_height: 260.0,
            window_size: [1200.0, 800.0],
            min_window_size: [600.0, 400.0],
        }
    }
}

// ---------------------------------------------------------------------------
// User-visible messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, text: text.into() }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Warning, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, text: text.into() }
    }
}

// ---------------------------------------------------------------------------
// Per-file session
// ---------------------------------------------------------------------------

/// Everything known about one uploaded file. Each UI interaction works on
/// one of these; nothing is shared between files.
#[derive(Debug, Clone)]
pub struct FileSession {
    /// Unique display label (`data.csv`, `data (2).csv`, ...).
    pub label: String,
    /// File name as uploaded.
    pub source_name: String,
    pub source_format: SourceFormat,
    /// Current table, including cleaning results and every column.
    pub table: Table,
    /// Columns to keep, in output order.
    pub selected: Vec<String>,
    pub show_chart: bool,
    pub target: ExportFormat,
    pub notices: Vec<Notice>,
    /// Most recent conversion, waiting to be saved.
    pub artifact: Option<ExportArtifact>,
}

impl FileSession {
    pub fn new(label: String, source_name: String, source_format: SourceFormat, table: Table) -> Self {
        let selected = table.column_names();
        Self {
            label,
            source_name,
            source_format,
            table,
            selected,
            show_chart: false,
            target: ExportFormat::default(),
            notices: Vec::new(),
            artifact: None,
        }
    }

    pub fn remove_duplicates(&mut self) {
        let removed = remove_duplicates(&mut self.table);
        log::info!("{}: removed {removed} duplicate rows", self.label);
        self.notices
            .push(Notice::success(format!("Duplicates removed! ({removed} rows)")));
    }

    pub fn fill_missing(&mut self) {
        let report = fill_missing_with_mean(&mut self.table);
        log::info!(
            "{}: filled {} missing values in {} columns",
            self.label,
            report.total_filled(),
            report.filled.len()
        );
        let detail: Vec<String> = report
            .filled
            .iter()
            .map(|f| format!("{} ← {}", f.column, format_float(f.mean)))
            .collect();
        let mut text = format!("Missing values filled! ({} cells)", report.total_filled());
        if !detail.is_empty() {
            text.push_str(&format!(" {}", detail.join(", ")));
        }
        self.notices.push(Notice::success(text));
        if !report.skipped.is_empty() {
            log::warn!("{}: no values to average in {:?}", self.label, report.skipped);
            self.notices.push(Notice::warning(format!(
                "Left unchanged, no values to average: {}",
                report.skipped.join(", ")
            )));
        }
    }

    pub fn is_selected(&self, column: &str) -> bool {
        self.selected.iter().any(|c| c == column)
    }

    /// Toggle a column in the selection. Newly selected columns go last.
    pub fn toggle_column(&mut self, column: &str) {
        if let Some(pos) = self.selected.iter().position(|c| c == column) {
            self.selected.remove(pos);
        } else if self.table.column(column).is_some() {
            self.selected.push(column.to_string());
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.table.column_names();
    }

    pub fn select_none(&mut self) {
        self.selected.clear();
    }

    /// The table restricted to the current selection.
    pub fn projected(&self) -> SweepResult<Table> {
        project(&self.table, &self.selected)
    }

    pub fn chart_series(&self) -> SweepResult<Vec<Series>> {
        numeric_series(&self.projected()?)
    }

    /// Convert the projected table to the target format. The suggested
    /// name is claimed in `names` so exports never collide. An empty
    /// selection is refused and leaves any earlier artifact in place.
    pub fn convert(&mut self, names: &mut UniqueNames) -> SweepResult<&ExportArtifact> {
        if self.selected.is_empty() {
            return Err(SweepError::NoColumnsSelected);
        }
        let bytes = export_table(&self.projected()?, self.target)?;
        if let Some(previous) = self.artifact.take() {
            names.release(&previous.file_name);
        }
        let file_name = names.claim(&suggest_file_name(&self.source_name, self.target));
        log::info!(
            "{}: converted to {} as {file_name} ({} bytes)",
            self.label,
            self.target.label(),
            bytes.len()
        );
        let artifact = self.artifact.insert(ExportArtifact {
            format: self.target,
            file_name,
            mime_type: self.target.mime_type(),
            bytes,
        });
        Ok(&*artifact)
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Debug, Default)]
pub struct AppState {
    pub config: AppConfig,
    /// One session per accepted upload, in upload order.
    pub sessions: Vec<FileSession>,
    /// Messages for uploads that were rejected.
    pub rejected: Vec<Notice>,
    pub upload_labels: UniqueNames,
    pub export_names: UniqueNames,
    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    /// Run ingestion for one upload. A failure is recorded and does not
    /// affect other files.
    pub fn ingest(&mut self, name: &str, bytes: &[u8]) -> bool {
        let loaded = SourceFormat::from_file_name(name)
            .and_then(|format| load_upload(name, bytes).map(|table| (format, table)));
        match loaded {
            Ok((format, table)) => {
                let label = self.upload_labels.claim(name);
                log::info!(
                    "Loaded {label}: {} rows, columns {:?}",
                    table.row_count(),
                    table.column_names()
                );
                self.sessions
                    .push(FileSession::new(label, name.to_string(), format, table));
                true
            }
            Err(e) => {
                self.reject(name, &e.to_string());
                false
            }
        }
    }

    pub fn reject(&mut self, name: &str, reason: &str) {
        log::warn!("Skipping {name}: {reason}");
        self.rejected.push(Notice::error(format!("{name}: {reason}")));
    }

    /// Drop a session, freeing its label and pending export name.
    pub fn remove_session(&mut self, idx: usize) {
        if idx >= self.sessions.len() {
            return;
        }
        let session = self.sessions.remove(idx);
        self.upload_labels.release(&session.label);
        if let Some(artifact) = &session.artifact {
            self.export_names.release(&artifact.file_name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn state_with(name: &str, bytes: &[u8]) -> AppState {
        let mut state = AppState::default();
        assert!(state.ingest(name, bytes));
        state
    }

    #[test]
    fn failed_uploads_do_not_stop_others() {
        let mut state = AppState::default();
        assert!(!state.ingest("notes.txt", b"a\n1\n"));
        assert!(!state.ingest("empty.csv", b"a,b\n"));
        assert!(state.ingest("ok.csv", b"a\n1\n"));
        assert_eq!(state.sessions.len(), 1);
        assert_eq!(state.rejected.len(), 2);
        assert!(state.rejected[1].text.contains("empty.csv is empty"));
    }

    #[test]
    fn same_name_uploads_get_distinct_labels() {
        let mut state = AppState::default();
        state.ingest("data.csv", b"a\n1\n");
        state.ingest("data.csv", b"a\n2\n");
        assert_eq!(state.sessions[0].label, "data.csv");
        assert_eq!(state.sessions[1].label, "data (2).csv");

        state.remove_session(0);
        state.ingest("data.csv", b"a\n3\n");
        assert_eq!(state.sessions[1].label, "data.csv");
    }

    #[test]
    fn cleaning_persists_in_the_session() {
        let mut state = state_with("s.csv", b"a,b\n1,\n1,\n2,4\n");
        let session = &mut state.sessions[0];
        session.remove_duplicates();
        session.fill_missing();
        assert_eq!(session.table.row_count(), 2);
        assert_eq!(
            session.table.columns[1].values,
            vec![CellValue::Float(4.0), CellValue::Float(4.0)]
        );
        assert_eq!(session.notices.len(), 2);
    }

    #[test]
    fn selection_order_follows_toggles() {
        let mut state = state_with("s.csv", b"a,b,c\n1,2,3\n");
        let session = &mut state.sessions[0];
        session.toggle_column("a");
        session.toggle_column("a");
        session.toggle_column("missing");
        assert_eq!(session.selected, vec!["b", "c", "a"]);
        assert_eq!(session.projected().unwrap().column_names(), vec!["b", "c", "a"]);
        session.select_none();
        assert!(session.projected().unwrap().columns.is_empty());
        session.select_all();
        assert_eq!(session.selected, vec!["a", "b", "c"]);
    }

    #[test]
    fn chart_needs_a_numeric_selection() {
        let mut state = state_with("s.csv", b"name,n\nx,1\n");
        let session = &mut state.sessions[0];
        assert_eq!(session.chart_series().unwrap().len(), 1);
        session.toggle_column("n");
        assert!(session.chart_series().is_err());
    }

    #[test]
    fn convert_projects_and_disambiguates_names() {
        let mut state = AppState::default();
        state.ingest("data.csv", b"a,b\n1,x\n");
        state.ingest("data.xlsx", &{
            let mut wb = rust_xlsxwriter::Workbook::new();
            let ws = wb.add_worksheet();
            ws.write_string(0, 0, "a").unwrap();
            ws.write_number(1, 0, 1).unwrap();
            wb.save_to_buffer().unwrap()
        });
        let AppState { sessions, export_names, .. } = &mut state;

        sessions[0].toggle_column("b");
        let first = sessions[0].convert(export_names).unwrap().clone();
        assert_eq!(first.file_name, "data.csv");
        assert_eq!(first.mime_type, "text/csv");
        assert_eq!(String::from_utf8(first.bytes).unwrap(), "a\n1\n");

        let second = sessions[1].convert(export_names).unwrap();
        assert_eq!(second.file_name, "data (2).csv");

        sessions[1].target = ExportFormat::Excel;
        let third = sessions[1].convert(export_names).unwrap();
        assert_eq!(third.file_name, "data.xlsx");
        assert!(third.bytes.starts_with(b"PK"));
    }

    #[test]
    fn convert_refuses_an_empty_selection() {
        let mut state = state_with("data.csv", b"a\n1\n");
        let AppState { sessions, export_names, .. } = &mut state;
        let session = &mut sessions[0];
        session.convert(export_names).unwrap();

        session.select_none();
        let err = session.convert(export_names).unwrap_err();
        assert!(matches!(err, SweepError::NoColumnsSelected));
        assert_eq!(session.artifact.as_ref().unwrap().file_name, "data.csv");
        assert_eq!(export_names.claim("data.csv"), "data (2).csv");
    }
}
