use std::time::Duration;

use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::panels;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WasteForecastApp {
    pub state: AppState,
}

impl WasteForecastApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for WasteForecastApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll_upload();
        if self.state.upload.is_submitting() {
            // Keep polling until the worker reports back.
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: navigation ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: current view ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| match self.state.view {
                View::Upload => panels::upload_panel(ui, &mut self.state),
                View::Dashboard => panels::dashboard_panel(ui, &mut self.state),
            });
        });
    }
}
