use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::export::{ExportArtifact, ExportFormat};
use crate::data::naming::UniqueNames;
use crate::state::{AppConfig, AppState, FileSession, Notice, NoticeLevel};
use crate::ui::{plot, preview};

const SUCCESS_GREEN: Color32 = Color32::from_rgb(80, 200, 120);

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_files_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.sessions.is_empty(), egui::Button::new("Close all"))
                .clicked()
            {
                while !state.sessions.is_empty() {
                    state.remove_session(0);
                }
                state.rejected.clear();
                state.status_message = None;
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("{} file(s) loaded", state.sessions.len()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – file list
// ---------------------------------------------------------------------------

/// Render the list of loaded files and the uploads that were skipped.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Files");
    ui.separator();

    if state.sessions.is_empty() {
        ui.label("No files loaded.");
    }
    for session in &state.sessions {
        ui.label(RichText::new(&session.label).strong());
        ui.label(format!(
            "{} · {} rows × {} columns",
            session.source_format.label(),
            session.table.row_count(),
            session.table.column_count()
        ));
        ui.add_space(4.0);
    }

    if !state.rejected.is_empty() {
        ui.separator();
        ui.strong("Skipped");
        for notice in &state.rejected {
            notice_label(ui, notice);
        }
        if ui.small_button("Clear").clicked() {
            state.rejected.clear();
        }
    }
}

// ---------------------------------------------------------------------------
// Central panel – one section per file
// ---------------------------------------------------------------------------

/// Render every file session, top to bottom.
pub fn file_sections(ui: &mut Ui, state: &mut AppState) {
    if state.sessions.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload CSV or Excel files  (File → Open…, or drop them here)");
        });
        return;
    }

    let config = state.config;
    let mut remove: Option<usize> = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let AppState {
                sessions,
                export_names,
                ..
            } = &mut *state;

            for (idx, session) in sessions.iter_mut().enumerate() {
                if file_section(ui, session, export_names, &config) {
                    remove = Some(idx);
                }
                ui.separator();
            }

            ui.label(RichText::new("✅ All files processed successfully!").color(SUCCESS_GREEN));
        });

    if let Some(idx) = remove {
        log::info!("Closing {}", state.sessions[idx].label);
        state.remove_session(idx);
    }
}

/// Render one file's pipeline controls. Returns `true` when the user asked
/// to close the file.
fn file_section(
    ui: &mut Ui,
    session: &mut FileSession,
    export_names: &mut UniqueNames,
    config: &AppConfig,
) -> bool {
    let mut close = false;
    let title = RichText::new(&session.label).heading();

    egui::CollapsingHeader::new(title)
        .id_salt(&session.label)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            // ---- Preview ----
            ui.strong(format!("Preview of {}", session.label));
            preview::preview_table(
                ui,
                &session.label,
                &session.table.head(config.preview_rows),
            );
            ui.label(format!(
                "{} rows × {} columns",
                session.table.row_count(),
                session.table.column_count()
            ));
            ui.add_space(6.0);

            // ---- Cleaning ----
            ui.strong("Data cleaning");
            ui.horizontal(|ui: &mut Ui| {
                if ui.button("🗑 Remove duplicates").clicked() {
                    session.remove_duplicates();
                }
                if ui.button("🔧 Fill missing values").clicked() {
                    session.fill_missing();
                }
            });
            ui.add_space(6.0);

            // ---- Column selection ----
            column_selector(ui, session);
            ui.add_space(6.0);

            // ---- Visualization ----
            ui.checkbox(&mut session.show_chart, "📉 Show visualization");
            if session.show_chart {
                plot::numeric_chart(ui, session, config.chart_height);
            }
            ui.add_space(6.0);

            // ---- Conversion ----
            conversion_controls(ui, session, export_names);

            // ---- Messages ----
            if !session.notices.is_empty() {
                ui.add_space(4.0);
                for notice in &session.notices {
                    notice_label(ui, notice);
                }
                if ui.small_button("Clear messages").clicked() {
                    session.notices.clear();
                }
            }

            ui.add_space(4.0);
            if ui.button("Close file").clicked() {
                close = true;
            }
        });

    close
}

fn column_selector(ui: &mut Ui, session: &mut FileSession) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Columns");
        if ui.small_button("All").clicked() {
            session.select_all();
        }
        if ui.small_button("None").clicked() {
            session.select_none();
        }
    });

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for name in session.table.column_names() {
            let mut checked = session.is_selected(&name);
            if ui.checkbox(&mut checked, name.as_str()).changed() {
                session.toggle_column(&name);
            }
        }
    });

    if session.selected.is_empty() {
        ui.label(RichText::new("No columns selected.").color(Color32::YELLOW));
    } else {
        ui.weak(format!("Output order: {}", session.selected.join(", ")));
    }
}

fn conversion_controls(ui: &mut Ui, session: &mut FileSession, export_names: &mut UniqueNames) {
    ui.horizontal(|ui: &mut Ui| {
        ui.strong(format!("Convert {} to:", session.label));
        for format in ExportFormat::ALL {
            ui.radio_value(&mut session.target, format, format.label());
        }
    });

    ui.horizontal(|ui: &mut Ui| {
        let convert = ui
            .add_enabled(!session.selected.is_empty(), egui::Button::new("💾 Convert"))
            .on_disabled_hover_text("Select at least one column");
        if convert.clicked() {
            match session.convert(export_names) {
                Ok(artifact) => {
                    let text = format!(
                        "Ready: {} ({}, {} bytes)",
                        artifact.file_name,
                        artifact.mime_type,
                        artifact.bytes.len()
                    );
                    session.notices.push(Notice::success(text));
                }
                Err(e) => {
                    log::error!("{}: conversion failed: {e}", session.label);
                    session.notices.push(Notice::error(format!("Conversion failed: {e}")));
                }
            }
        }

        let mut saved: Option<Notice> = None;
        if let Some(artifact) = &session.artifact {
            if ui
                .button(format!("⬇ Download {} as {}", session.label, artifact.format.label()))
                .clicked()
            {
                saved = match save_artifact_dialog(artifact) {
                    Ok(Some(path)) => {
                        log::info!("Saved {} to {}", artifact.file_name, path.display());
                        Some(Notice::success(format!("Saved to {}", path.display())))
                    }
                    Ok(None) => None,
                    Err(e) => {
                        log::error!("Failed to save {}: {e:#}", artifact.file_name);
                        Some(Notice::error(format!("Error: {e:#}")))
                    }
                };
            }
        }
        if let Some(notice) = saved {
            session.notices.push(notice);
        }
    });
}

fn notice_label(ui: &mut Ui, notice: &Notice) {
    let (icon, color) = match notice.level {
        NoticeLevel::Success => ("✅", SUCCESS_GREEN),
        NoticeLevel::Warning => ("⚠", Color32::YELLOW),
        NoticeLevel::Error => ("❌", Color32::RED),
    };
    ui.label(RichText::new(format!("{icon} {}", notice.text)).color(color));
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_files_dialog(state: &mut AppState) {
    let files = rfd::FileDialog::new()
        .set_title("Upload your files (CSV or Excel)")
        .add_filter("Supported files", &["csv", "xlsx"])
        .add_filter("CSV", &["csv"])
        .add_filter("Excel", &["xlsx"])
        .pick_files();

    let Some(paths) = files else {
        return;
    };
    let accepted = paths.iter().filter(|p| ingest_path(state, p)).count();
    state.status_message = if accepted == paths.len() {
        None
    } else {
        Some(format!("Loaded {accepted} of {} files", paths.len()))
    };
}

/// Read a file from disk and hand it to ingestion under its file name.
pub fn ingest_path(state: &mut AppState, path: &Path) -> bool {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match std::fs::read(path).with_context(|| format!("reading {}", path.display())) {
        Ok(bytes) => state.ingest(&name, &bytes),
        Err(e) => {
            log::error!("Failed to read upload: {e:#}");
            state.reject(&name, &format!("{e:#}"));
            false
        }
    }
}

/// Ask where to save a converted file and write it there. `Ok(None)` means
/// the dialog was cancelled.
fn save_artifact_dialog(artifact: &ExportArtifact) -> Result<Option<PathBuf>> {
    let target = rfd::FileDialog::new()
        .set_title("Save converted file")
        .set_file_name(&artifact.file_name)
        .add_filter(artifact.format.label(), &[artifact.format.extension()])
        .save_file();

    let Some(path) = target else {
        return Ok(None);
    };
    std::fs::write(&path, &artifact.bytes)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(Some(path))
}
