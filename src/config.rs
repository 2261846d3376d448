use std::path::PathBuf;
use std::time::Duration;

use anyhow::Error;
use confique::Config;

use crate::data::model::ForecastModel;
use crate::data::store::default_results_path;

#[derive(Debug, Config)]
pub struct ForecastConfig {
    /// Where datasets are posted for prediction.
    #[config(env = "WASTE_FORECAST_ENDPOINT", default = "http://localhost:8000/api/predict")]
    pub prediction_endpoint: String,

    /// Overrides the default location of the stored results file.
    #[config(env = "WASTE_FORECAST_RESULTS_PATH")]
    pub results_path: Option<PathBuf>,

    /// Unset means wait for the service as long as it takes.
    #[config(env = "WASTE_FORECAST_REQUEST_TIMEOUT_SECONDS")]
    pub request_timeout_seconds: Option<u64>,

    /// Keep results only for the lifetime of the process when false.
    #[config(env = "WASTE_FORECAST_PERSIST_RESULTS", default = true)]
    pub persist_results: bool,

    #[config(env = "WASTE_FORECAST_DEFAULT_MODEL", default = "prophet")]
    pub default_model: ForecastModel,
}

impl ForecastConfig {
    pub fn load() -> Result<ForecastConfig, Error> {
        let c = ForecastConfig::builder()
            .env()
            .file("waste-forecast.toml")
            .load()?;

        Ok(c)
    }

    pub fn results_path(&self) -> PathBuf {
        self.results_path
            .clone()
            .unwrap_or_else(default_results_path)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_seconds.map(Duration::from_secs)
    }
}
