use std::sync::Arc;

use crate::data::assemble::{assemble, DashboardView};
use crate::data::model::{ForecastModel, PredictionPayload};
use crate::data::store::ResultStore;
use crate::upload::{Completion, UploadWorkflow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Upload,
    Dashboard,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub view: View,

    pub upload: UploadWorkflow,

    store: Arc<dyn ResultStore>,

    /// Payload read when the dashboard was last opened.
    payload: Option<PredictionPayload>,

    /// Model whose predictions and metrics are on display.
    pub selected_model: ForecastModel,

    /// Derived from `payload` and `selected_model` (cached).
    pub dashboard: DashboardView,
}

impl AppState {
    pub fn new(
        upload: UploadWorkflow,
        store: Arc<dyn ResultStore>,
        default_model: ForecastModel,
    ) -> Self {
        Self {
            view: View::Upload,
            upload,
            store,
            payload: None,
            selected_model: default_model,
            dashboard: DashboardView::NoData,
        }
    }

    pub fn show_upload(&mut self) {
        self.view = View::Upload;
    }

    /// Open the dashboard, reading the store afresh.
    ///
    /// Leaving the upload view abandons whatever was selected there.
    pub fn show_dashboard(&mut self) {
        if self.view == View::Upload {
            self.upload.reset();
        }
        self.payload = self.store.read();
        self.rebuild_dashboard();
        self.view = View::Dashboard;
    }

    /// Switch the model on display. Re-derives from the payload already
    /// in hand; the store is not consulted again.
    pub fn set_model(&mut self, model: ForecastModel) {
        if self.selected_model != model {
            self.selected_model = model;
            self.rebuild_dashboard();
        }
    }

    /// Forget the stored payload.
    pub fn clear_results(&mut self) {
        match self.store.clear() {
            Ok(()) => log::info!("Prediction results cleared"),
            Err(e) => log::error!("Failed to clear prediction results: {e}"),
        }
        self.payload = self.store.read();
        self.rebuild_dashboard();
    }

    /// Pick up a finished submission; jumps to the dashboard on success.
    pub fn poll_upload(&mut self) {
        if self.upload.poll() == Some(Completion::Succeeded) {
            self.show_dashboard();
        }
    }

    fn rebuild_dashboard(&mut self) {
        self.dashboard = assemble(self.payload.as_ref(), self.selected_model);
    }
}
