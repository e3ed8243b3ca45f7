use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color::generate_palette;
use crate::state::FileSession;

// ---------------------------------------------------------------------------
// Numeric line chart
// ---------------------------------------------------------------------------

/// Plot every numeric column of the session's projected table against row
/// index, or show a warning when there is nothing numeric to draw.
pub fn numeric_chart(ui: &mut Ui, session: &FileSession, height: f32) {
    let series = match session.chart_series() {
        Ok(series) => series,
        Err(e) => {
            ui.label(RichText::new(format!("⚠ {e}")).color(Color32::YELLOW));
            return;
        }
    };

    let colors = generate_palette(series.len());

    Plot::new(("numeric_chart", &session.label))
        .legend(Legend::default())
        .height(height)
        .x_axis_label("Row")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (s, color) in series.iter().zip(colors) {
                let points: PlotPoints = s.points.iter().copied().collect();
                let line = Line::new(points).name(&s.name).color(color).width(1.5);
                plot_ui.line(line);
            }
        });
}
