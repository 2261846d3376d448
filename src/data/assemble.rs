use std::fmt;

use super::model::{FeatureImportance, ForecastModel, PredictionPayload};

// ---------------------------------------------------------------------------
// Display-ready structures
// ---------------------------------------------------------------------------

/// One x-position on the chart.
///
/// Historical rows fill `historical`, forecast rows fill `prediction`
/// (when the service sent a value for the selected model).
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesPoint {
    pub year: i64,
    pub historical: Option<f64>,
    pub prediction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedMetrics {
    pub rmse: String,
    pub r2: String,
}

impl FormattedMetrics {
    pub fn rmse_line(&self) -> String {
        format!("RMSE: {}", self.rmse)
    }

    pub fn r2_line(&self) -> String {
        format!("R² Score: {}", self.r2)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRow {
    pub feature: String,
    pub importance: String,
}

impl fmt::Display for FeatureRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.feature, self.importance)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Visualization {
    pub model: ForecastModel,
    /// Field the "Prediction" line is read from, e.g. `prophet_prediction`.
    pub prediction_key: String,
    pub series: Vec<SeriesPoint>,
    /// `None` when the service reported no metrics for `model`.
    pub metrics: Option<FormattedMetrics>,
    pub features: Vec<FeatureRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView {
    NoData,
    Ready(Visualization),
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Derive everything the dashboard draws from a stored payload.
///
/// Pure and synchronous; switching `model` only needs another call.
pub fn assemble(payload: Option<&PredictionPayload>, model: ForecastModel) -> DashboardView {
    let Some(payload) = payload else {
        return DashboardView::NoData;
    };

    let historical = payload.historical_data.iter().map(|p| SeriesPoint {
        year: p.year,
        historical: Some(p.waste),
        prediction: None,
    });
    let predicted = payload.predictions.iter().map(|p| SeriesPoint {
        year: p.year,
        historical: None,
        prediction: p.value_for(model),
    });

    DashboardView::Ready(Visualization {
        model,
        prediction_key: model.prediction_field(),
        series: historical.chain(predicted).collect(),
        metrics: payload.metrics_for(model).map(|m| FormattedMetrics {
            rmse: format_2dp(m.rmse),
            r2: format_2dp(m.r2),
        }),
        features: payload.feature_importance.iter().map(feature_row).collect(),
    })
}

fn feature_row(f: &FeatureImportance) -> FeatureRow {
    FeatureRow {
        feature: f.feature.clone(),
        importance: format_2dp(f.importance),
    }
}

/// Two decimals, exact ties rounded away from zero.
///
/// `{:.2}` breaks exact ties towards the even digit. A value sitting exactly
/// halfway between two hundredths is always an odd multiple of 1/8, and for
/// those `v * 100` is exact, so `f64::round` settles the tie.
fn format_2dp(v: f64) -> String {
    let eighths = v * 8.0;
    let exact_tie = eighths.abs() < 9_007_199_254_740_992.0
        && eighths.fract() == 0.0
        && eighths % 2.0 != 0.0;
    if exact_tie {
        format!("{:.2}", (v * 100.0).round() / 100.0)
    } else {
        format!("{v:.2}")
    }
}
