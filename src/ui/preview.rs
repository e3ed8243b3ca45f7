use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::Table;

/// Render `table` as a striped grid. Header cells show the inferred column
/// type on hover. `id` keeps several previews on one page apart.
pub fn preview_table(ui: &mut Ui, id: &str, table: &Table) {
    if table.columns.is_empty() {
        ui.label("No columns to show.");
        return;
    }

    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .columns(TableColumn::auto().at_least(60.0), table.column_count())
                .header(22.0, |mut header| {
                    for col in &table.columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col.name.as_str()).on_hover_text(col.kind.label());
                        });
                    }
                })
                .body(|mut body| {
                    for row in 0..table.row_count() {
                        body.row(18.0, |mut cells| {
                            for col in &table.columns {
                                cells.col(|ui: &mut Ui| {
                                    ui.label(col.values[row].to_string());
                                });
                            }
                        });
                    }
                });
        });
    });
}
