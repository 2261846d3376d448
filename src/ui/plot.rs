use eframe::egui::Ui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::color::{model_color, HISTORICAL_COLOR};
use crate::data::assemble::Visualization;

// ---------------------------------------------------------------------------
// Forecast chart
// ---------------------------------------------------------------------------

/// Render observed values followed by the selected model's forecast.
pub fn forecast_plot(ui: &mut Ui, vis: &Visualization) {
    let historical: Vec<[f64; 2]> = vis
        .series
        .iter()
        .filter_map(|p| Some([p.year as f64, p.historical?]))
        .collect();
    let predicted: Vec<[f64; 2]> = vis
        .series
        .iter()
        .filter_map(|p| Some([p.year as f64, p.prediction?]))
        .collect();
    let prediction_color = model_color(vis.model);

    Plot::new("forecast_plot")
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Waste")
        .height(400.0)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(historical.clone()))
                    .name("Historical")
                    .color(HISTORICAL_COLOR)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(historical))
                    .name("Historical")
                    .color(HISTORICAL_COLOR)
                    .radius(3.0),
            );

            plot_ui.line(
                Line::new(PlotPoints::from(predicted.clone()))
                    .name("Prediction")
                    .color(prediction_color)
                    .width(2.0),
            );
            plot_ui.points(
                Points::new(PlotPoints::from(predicted))
                    .name("Prediction")
                    .color(prediction_color)
                    .radius(3.0),
            );
        });
}
