use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::ForecastModel;

/// Colour of the observed ("Historical") line.
pub const HISTORICAL_COLOR: Color32 = Color32::from_rgb(0x88, 0x84, 0xd8);

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 120.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.55, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colour of the "Prediction" line for a given model.
pub fn model_color(model: ForecastModel) -> Color32 {
    let palette = generate_palette(ForecastModel::ALL.len());
    ForecastModel::ALL
        .iter()
        .position(|m| *m == model)
        .and_then(|i| palette.get(i).copied())
        .unwrap_or(Color32::GRAY)
}
