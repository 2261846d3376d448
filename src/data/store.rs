use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use thiserror::Error;

use super::model::PredictionPayload;

/// File name of the persisted prediction slot.
pub const RESULTS_FILE_NAME: &str = "prediction_results.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("serializing prediction results: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("writing prediction results to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// ResultStore – the single slot holding the latest payload
// ---------------------------------------------------------------------------

/// Holds the most recent prediction payload.
///
/// Only the upload workflow writes; the dashboard only reads.
/// Absence is an ordinary state, not an error.
pub trait ResultStore: Send + Sync {
    /// Current payload, or `None` if nothing has been stored.
    fn read(&self) -> Option<PredictionPayload>;

    /// Replace the stored payload. Last write wins.
    fn write(&self, payload: &PredictionPayload) -> Result<(), StoreError>;

    fn clear(&self) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// File-backed store
// ---------------------------------------------------------------------------

/// Persists the payload as JSON in a single file.
pub struct FileResultStore {
    path: PathBuf,
}

impl FileResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

pub fn default_results_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("WasteForecast")
        .join(RESULTS_FILE_NAME)
}

impl ResultStore for FileResultStore {
    fn read(&self) -> Option<PredictionPayload> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                log::warn!("Cannot read {}: {e}", self.path.display());
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(payload) => Some(payload),
            Err(e) => {
                log::warn!("Ignoring unreadable results in {}: {e}", self.path.display());
                None
            }
        }
    }

    fn write(&self, payload: &PredictionPayload) -> Result<(), StoreError> {
        let json = serde_json::to_vec(payload)?;
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
        }
        // Write next to the target and rename so readers never see half a file.
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| self.io_error(e))?;
        fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn clear(&self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Keeps the payload for the lifetime of the process only.
#[derive(Default)]
pub struct MemoryResultStore {
    slot: Mutex<Option<String>>,
}

impl ResultStore for MemoryResultStore {
    fn read(&self) -> Option<PredictionPayload> {
        let slot = self.slot.lock();
        let json = slot.as_deref()?;
        serde_json::from_str(json).ok()
    }

    fn write(&self, payload: &PredictionPayload) -> Result<(), StoreError> {
        let json = serde_json::to_string(payload)?;
        *self.slot.lock() = Some(json);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.slot.lock() = None;
        Ok(())
    }
}
