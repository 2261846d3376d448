mod api;
mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;
mod upload;

use std::sync::Arc;

use anyhow::Context;
use api::HttpPredictionService;
use app::WasteForecastApp;
use config::ForecastConfig;
use data::store::{FileResultStore, MemoryResultStore, ResultStore};
use eframe::egui;
use state::AppState;
use upload::UploadWorkflow;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = ForecastConfig::load().context("loading configuration")?;

    let service = HttpPredictionService::new(
        config.prediction_endpoint.clone(),
        config.request_timeout(),
    )
    .context("building HTTP client")?;
    log::info!("Predictions requested from {}", service.endpoint());

    let store: Arc<dyn ResultStore> = if config.persist_results {
        let file_store = FileResultStore::new(config.results_path());
        log::info!("Prediction results kept in {}", file_store.path().display());
        Arc::new(file_store)
    } else {
        log::info!("Prediction results kept in memory only");
        Arc::new(MemoryResultStore::default())
    };

    let upload = UploadWorkflow::new(Arc::new(service), store.clone());
    let state = AppState::new(upload, store, config.default_model);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 760.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Waste Prediction Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(WasteForecastApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
