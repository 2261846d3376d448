use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::assemble::DashboardView;
use crate::data::model::{ForecastModel, UploadCandidate};
use crate::state::{AppState, View};
use crate::ui::plot;
use crate::upload::UploadState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title and view switcher.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong("Waste Prediction Analysis");
        ui.separator();

        if ui
            .selectable_label(state.view == View::Upload, "Upload")
            .clicked()
        {
            state.show_upload();
        }
        if ui
            .selectable_label(state.view == View::Dashboard, "Dashboard")
            .clicked()
        {
            state.show_dashboard();
        }
    });
}

// ---------------------------------------------------------------------------
// Upload view
// ---------------------------------------------------------------------------

pub fn upload_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Upload Data");
    ui.separator();

    let submitting = state.upload.state() == UploadState::Submitting;

    ui.add_enabled_ui(!submitting, |ui: &mut Ui| {
        if ui.button("Choose file…").clicked() {
            open_file_dialog(state);
        }
    });

    if let Some(err) = state.upload.error() {
        ui.label(RichText::new(err).color(Color32::RED));
    }

    if let Some(candidate) = state.upload.candidate() {
        ui.label(format!("Selected file: {}", candidate.name));
    }

    ui.add_space(8.0);

    let label = if submitting {
        "Processing..."
    } else {
        "Upload and Generate Predictions"
    };
    if ui
        .add_enabled(state.upload.can_submit(), egui::Button::new(label))
        .clicked()
    {
        state.upload.submit();
    }
}

// ---------------------------------------------------------------------------
// Dashboard view
// ---------------------------------------------------------------------------

pub fn dashboard_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dashboard == DashboardView::NoData {
        show_no_data(ui);
        return;
    }

    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Prediction Results");
        if ui.small_button("Clear").clicked() {
            state.clear_results();
        }
    });
    ui.separator();

    let mut selected = state.selected_model;
    egui::ComboBox::from_id_salt("model_selector")
        .selected_text(selected.label())
        .show_ui(ui, |ui: &mut Ui| {
            for model in ForecastModel::ALL {
                ui.selectable_value(&mut selected, model, model.label());
            }
        });
    state.set_model(selected);

    // Mutation is done; the rest only reads.
    let DashboardView::Ready(vis) = &state.dashboard else {
        show_no_data(ui);
        return;
    };
    ui.weak(format!("Prediction series: {}", vis.prediction_key));

    plot::forecast_plot(ui, vis);

    ui.add_space(12.0);
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].strong("Model Performance");
        // Nothing to show when the service reported no metrics for this model.
        if let Some(metrics) = &vis.metrics {
            cols[0].label(metrics.rmse_line());
            cols[0].label(metrics.r2_line());
        }

        cols[1].strong("Feature Importance");
        for row in &vis.features {
            cols[1].label(row.to_string());
        }
    });
}

fn show_no_data(ui: &mut Ui) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading("No prediction data available");
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Select historical waste data")
        .add_filter("CSV", &["csv"])
        .add_filter("All files", &["*"])
        .pick_file();

    let Some(path) = file else {
        return;
    };
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    match std::fs::read(&path) {
        Ok(content) => state.upload.select_file(UploadCandidate::new(name, content)),
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            state.upload.selection_failed(format!("Could not read {name}"));
        }
    }
}
