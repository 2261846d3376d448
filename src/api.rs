//! Client for the remote forecasting service.

use std::time::Duration;

use reqwest::blocking::{multipart, Client};
use thiserror::Error;

use crate::data::model::{PredictionPayload, UploadCandidate};

/// Any way a prediction request can fail. All variants surface to the
/// user as the same generic upload error.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    Status(u16),
    #[error("malformed prediction response: {0}")]
    Parse(String),
    #[error("prediction request ended without a response")]
    Abandoned,
}

/// Something that turns an uploaded dataset into predictions.
pub trait PredictionService: Send + Sync {
    fn predict(&self, candidate: &UploadCandidate) -> Result<PredictionPayload, TransportError>;
}

/// Posts the dataset as a multipart form to the prediction endpoint.
pub struct HttpPredictionService {
    endpoint: String,
    client: Client,
}

impl HttpPredictionService {
    /// `timeout` of `None` waits for the service indefinitely.
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            endpoint: endpoint.into(),
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PredictionService for HttpPredictionService {
    fn predict(&self, candidate: &UploadCandidate) -> Result<PredictionPayload, TransportError> {
        let part = multipart::Part::bytes(candidate.content.clone())
            .file_name(candidate.name.clone())
            .mime_str("text/csv")
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<PredictionPayload>()
            .map_err(|e| TransportError::Parse(e.to_string()))
    }
}
