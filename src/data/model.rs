use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

// ---------------------------------------------------------------------------
// ForecastModel – which remote-computed series is on display
// ---------------------------------------------------------------------------

/// The forecasting models the service reports on.
///
/// Purely a display-time selector: switching it never triggers a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastModel {
    #[default]
    Prophet,
    Lstm,
    Arima,
}

impl ForecastModel {
    pub const ALL: [ForecastModel; 3] = [
        ForecastModel::Prophet,
        ForecastModel::Lstm,
        ForecastModel::Arima,
    ];

    /// Key used in the `metrics` map.
    pub fn key(self) -> &'static str {
        match self {
            ForecastModel::Prophet => "prophet",
            ForecastModel::Lstm => "lstm",
            ForecastModel::Arima => "arima",
        }
    }

    /// Field name carrying this model's value in a prediction row.
    pub fn prediction_field(self) -> String {
        format!("{}_prediction", self.key())
    }

    pub fn label(self) -> &'static str {
        match self {
            ForecastModel::Prophet => "Prophet",
            ForecastModel::Lstm => "LSTM",
            ForecastModel::Arima => "ARIMA",
        }
    }
}

impl FromStr for ForecastModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ForecastModel::ALL
            .into_iter()
            .find(|m| m.key() == s)
            .ok_or_else(|| format!("unknown forecasting model: {s}"))
    }
}

// ---------------------------------------------------------------------------
// UploadCandidate – the file the user picked
// ---------------------------------------------------------------------------

/// A user-selected dataset file, held in memory until submission.
///
/// Only files that passed the `.csv` check are ever held, so there is no
/// separate validity flag.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadCandidate {
    pub name: String,
    pub content: Vec<u8>,
}

impl UploadCandidate {
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
        }
    }
}

// ---------------------------------------------------------------------------
// PredictionPayload – the service response
// ---------------------------------------------------------------------------

/// One observed year of the uploaded dataset.
///
/// The service echoes back the whole input row; columns other than
/// `year` and `waste` are kept untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    pub year: i64,
    pub waste: f64,
    #[serde(flatten)]
    pub extra: BTreeMap<String, JsonValue>,
}

/// One forecast year: `year` plus one `<model>_prediction` value per model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPoint {
    pub year: i64,
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl PredictionPoint {
    /// Value predicted by `model` for this year, if the service sent one.
    pub fn value_for(&self, model: ForecastModel) -> Option<f64> {
        self.values.get(&model.prediction_field()).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelMetrics {
    pub rmse: f64,
    pub r2: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Full prediction result for one uploaded dataset.
///
/// Sequences keep the order the service sent; nothing here re-sorts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionPayload {
    pub historical_data: Vec<HistoricalPoint>,
    pub predictions: Vec<PredictionPoint>,
    pub metrics: BTreeMap<String, ModelMetrics>,
    pub feature_importance: Vec<FeatureImportance>,
}

impl PredictionPayload {
    pub fn metrics_for(&self, model: ForecastModel) -> Option<&ModelMetrics> {
        self.metrics.get(model.key())
    }
}
