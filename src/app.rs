use eframe::egui;

use crate::state::AppState;
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct DataSweeperApp {
    pub state: AppState,
}

impl DataSweeperApp {
    /// Ingest files dropped onto the window. The web backend hands over
    /// bytes; native backends hand over a path.
    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            match (&file.bytes, &file.path) {
                (Some(bytes), _) => {
                    self.state.ingest(&file.name, &bytes[..]);
                }
                (None, Some(path)) => {
                    panels::ingest_path(&mut self.state, path);
                }
                (None, None) => log::warn!("Dropped file {:?} carried no data", file.name),
            }
        }
    }
}

impl eframe::App for DataSweeperApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.accept_dropped_files(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: loaded files ----
        egui::SidePanel::left("file_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: per-file pipeline ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("🧹 Data Sweeper");
            ui.label("Convert files between CSV and Excel with built-in cleaning and visualization.");
            ui.separator();
            panels::file_sections(ui, &mut self.state);
        });
    }
}
