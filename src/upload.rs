use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

use crate::api::{PredictionService, TransportError};
use crate::data::model::{PredictionPayload, UploadCandidate};
use crate::data::store::ResultStore;
use crate::data::validate::validate;

/// Shown for every failed submission, whatever the cause.
pub const UPLOAD_ERROR: &str = "Error uploading file. Please try again.";
pub const NO_FILE_ERROR: &str = "Please select a file first";

// ---------------------------------------------------------------------------
// States
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    FileSelected,
    Submitting,
    Succeeded,
    Failed,
}

/// Lifecycle of the one outstanding prediction request.
///
/// `InFlight` owns the receiving end of the worker's completion signal.
/// Cancellation is not supported: once started, a request always
/// resolves or rejects.
#[derive(Debug)]
pub enum SubmitTask {
    Idle,
    InFlight(Receiver<Result<PredictionPayload, TransportError>>),
    Resolved,
    Rejected,
}

/// What the caller should react to after [`UploadWorkflow::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Payload stored; switch to the dashboard.
    Succeeded,
    Failed,
}

// ---------------------------------------------------------------------------
// Workflow
// ---------------------------------------------------------------------------

/// Coordinates file selection, submission and storing the result.
pub struct UploadWorkflow {
    service: Arc<dyn PredictionService>,
    store: Arc<dyn ResultStore>,
    state: UploadState,
    candidate: Option<UploadCandidate>,
    error: Option<String>,
    task: SubmitTask,
}

impl UploadWorkflow {
    pub fn new(service: Arc<dyn PredictionService>, store: Arc<dyn ResultStore>) -> Self {
        Self {
            service,
            store,
            state: UploadState::Idle,
            candidate: None,
            error: None,
            task: SubmitTask::Idle,
        }
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn candidate(&self) -> Option<&UploadCandidate> {
        self.candidate.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.state == UploadState::Submitting
    }

    /// Whether the submit action should be enabled.
    pub fn can_submit(&self) -> bool {
        self.candidate.is_some() && !self.is_submitting()
    }

    /// Take a newly picked file. Never touches the result store.
    pub fn select_file(&mut self, candidate: UploadCandidate) {
        if self.is_submitting() {
            log::warn!("Ignoring selection of {} while a submission is in flight", candidate.name);
            return;
        }
        match validate(&candidate.name) {
            Ok(()) => {
                log::info!("Selected {} ({} bytes)", candidate.name, candidate.content.len());
                self.candidate = Some(candidate);
                self.state = UploadState::FileSelected;
                self.error = None;
            }
            // A previously accepted file stays selected.
            Err(e) => {
                log::warn!("Rejected {}: {e}", candidate.name);
                self.error = Some(e.to_string());
            }
        }
    }

    /// Drop the selection and any message, unless a request is in flight.
    pub fn reset(&mut self) {
        if self.is_submitting() {
            return;
        }
        self.candidate = None;
        self.state = UploadState::Idle;
        self.error = None;
        self.task = SubmitTask::Idle;
    }

    /// Report a file that could not even be read from disk.
    pub fn selection_failed(&mut self, message: String) {
        if self.is_submitting() {
            return;
        }
        self.candidate = None;
        self.state = UploadState::Idle;
        self.error = Some(message);
    }

    /// Start the prediction request for the selected file.
    ///
    /// A no-op while a request is already in flight.
    pub fn submit(&mut self) {
        if self.is_submitting() {
            log::debug!("Submit ignored: request already in flight");
            return;
        }
        let Some(candidate) = self.candidate.clone() else {
            self.error = Some(NO_FILE_ERROR.to_string());
            return;
        };

        log::info!("Submitting {} for prediction", candidate.name);
        let (tx, rx) = mpsc::channel();
        let service = Arc::clone(&self.service);
        let spawned = thread::Builder::new()
            .name("prediction-request".to_string())
            .spawn(move || {
                // The receiver may be gone if the app closed; nothing to do then.
                let _ = tx.send(service.predict(&candidate));
            });

        match spawned {
            Ok(_) => {
                self.task = SubmitTask::InFlight(rx);
                self.state = UploadState::Submitting;
                self.error = None;
            }
            Err(e) => {
                log::error!("Could not start prediction request: {e}");
                self.task = SubmitTask::Rejected;
                self.fail();
            }
        }
    }

    /// Check for completion of the in-flight request without blocking.
    ///
    /// On success the payload replaces whatever the store held.
    pub fn poll(&mut self) -> Option<Completion> {
        let outcome = match &self.task {
            SubmitTask::InFlight(rx) => match rx.try_recv() {
                Ok(outcome) => outcome,
                Err(TryRecvError::Empty) => return None,
                Err(TryRecvError::Disconnected) => Err(TransportError::Abandoned),
            },
            _ => return None,
        };
        Some(self.complete(outcome))
    }

    fn complete(&mut self, outcome: Result<PredictionPayload, TransportError>) -> Completion {
        let stored = outcome.map_err(|e| e.to_string()).and_then(|payload| {
            self.store.write(&payload).map_err(|e| e.to_string())
        });

        match stored {
            Ok(()) => {
                log::info!("Prediction stored");
                self.task = SubmitTask::Resolved;
                self.state = UploadState::Succeeded;
                self.candidate = None;
                self.error = None;
                Completion::Succeeded
            }
            Err(e) => {
                log::error!("Prediction upload failed: {e}");
                self.task = SubmitTask::Rejected;
                self.fail();
                Completion::Failed
            }
        }
    }

    fn fail(&mut self) {
        self.state = UploadState::Failed;
        self.error = Some(UPLOAD_ERROR.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{Duration, Instant};

    use parking_lot::Mutex;

    use crate::data::model::tests::sample_payload;
    use crate::data::store::{MemoryResultStore, StoreError};

    /// Answers every request with `outcome`, the first one optionally
    /// held until the test opens the gate.
    struct FakeService {
        calls: AtomicUsize,
        gate: Mutex<Option<Receiver<()>>>,
        outcome: fn() -> Result<PredictionPayload, TransportError>,
    }

    impl FakeService {
        fn new(outcome: fn() -> Result<PredictionPayload, TransportError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: Mutex::new(None),
                outcome,
            }
        }

        fn gated(outcome: fn() -> Result<PredictionPayload, TransportError>) -> (Self, mpsc::Sender<()>) {
            let (tx, rx) = mpsc::channel();
            let service = Self::new(outcome);
            *service.gate.lock() = Some(rx);
            (service, tx)
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PredictionService for FakeService {
        fn predict(&self, _candidate: &UploadCandidate) -> Result<PredictionPayload, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let gate = self.gate.lock().take();
            if let Some(gate) = gate {
                gate.recv().unwrap();
            }
            (self.outcome)()
        }
    }

    struct PanickingService;

    impl PredictionService for PanickingService {
        fn predict(&self, _candidate: &UploadCandidate) -> Result<PredictionPayload, TransportError> {
            panic!("worker died");
        }
    }

    struct ReadOnlyStore;

    impl ResultStore for ReadOnlyStore {
        fn read(&self) -> Option<PredictionPayload> {
            None
        }
        fn write(&self, _payload: &PredictionPayload) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "results.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
        fn clear(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn ok_payload() -> Result<PredictionPayload, TransportError> {
        Ok(sample_payload())
    }

    fn server_error() -> Result<PredictionPayload, TransportError> {
        Err(TransportError::Status(500))
    }

    fn csv() -> UploadCandidate {
        UploadCandidate::new("readings.csv", b"year,waste\n2020,100\n".to_vec())
    }

    fn wait(workflow: &mut UploadWorkflow) -> Completion {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(done) = workflow.poll() {
                return done;
            }
            assert!(Instant::now() < deadline, "submission never completed");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn workflow_with(service: Arc<FakeService>, store: Arc<MemoryResultStore>) -> UploadWorkflow {
        UploadWorkflow::new(service, store)
    }

    #[test]
    fn rejected_file_sets_error_and_sends_nothing() {
        let service = Arc::new(FakeService::new(ok_payload));
        let store = Arc::new(MemoryResultStore::default());
        let mut workflow = workflow_with(service.clone(), store.clone());

        workflow.select_file(UploadCandidate::new("readings.txt", b"x".to_vec()));
        assert_eq!(workflow.state(), UploadState::Idle);
        assert_eq!(workflow.error(), Some("Please select a CSV file"));
        assert!(workflow.candidate().is_none());
        assert!(!workflow.can_submit());

        workflow.submit();
        assert_eq!(workflow.error(), Some(NO_FILE_ERROR));
        assert_eq!(workflow.state(), UploadState::Idle);
        assert_eq!(service.calls(), 0);
        assert!(store.read().is_none());
    }

    #[test]
    fn accepted_file_clears_previous_error() {
        let service = Arc::new(FakeService::new(ok_payload));
        let mut workflow = workflow_with(service, Arc::new(MemoryResultStore::default()));

        workflow.select_file(UploadCandidate::new("notes.md", vec![]));
        workflow.select_file(csv());
        assert_eq!(workflow.state(), UploadState::FileSelected);
        assert_eq!(workflow.error(), None);
        assert_eq!(workflow.candidate().map(|c| c.name.as_str()), Some("readings.csv"));
    }

    #[test]
    fn rejected_file_keeps_earlier_selection() {
        let service = Arc::new(FakeService::new(ok_payload));
        let mut workflow = workflow_with(service, Arc::new(MemoryResultStore::default()));

        workflow.select_file(UploadCandidate::new("a.csv", vec![]));
        workflow.select_file(UploadCandidate::new("b.txt", vec![]));
        assert_eq!(workflow.state(), UploadState::FileSelected);
        assert_eq!(workflow.candidate().map(|c| c.name.as_str()), Some("a.csv"));
        assert_eq!(workflow.error(), Some("Please select a CSV file"));
        assert!(workflow.can_submit());
    }

    #[test]
    fn reset_discards_selection_but_not_in_flight_request() {
        let (service, open) = FakeService::gated(server_error);
        let service = Arc::new(service);
        let mut workflow = workflow_with(service, Arc::new(MemoryResultStore::default()));

        workflow.select_file(csv());
        workflow.submit();
        workflow.reset();
        assert_eq!(workflow.state(), UploadState::Submitting);
        assert!(workflow.candidate().is_some());

        open.send(()).unwrap();
        assert_eq!(wait(&mut workflow), Completion::Failed);
        workflow.reset();
        assert_eq!(workflow.state(), UploadState::Idle);
        assert!(workflow.candidate().is_none());
        assert_eq!(workflow.error(), None);
        assert!(matches!(&workflow.task, SubmitTask::Idle));
    }

    #[test]
    fn successful_submit_stores_payload() {
        let service = Arc::new(FakeService::new(ok_payload));
        let store = Arc::new(MemoryResultStore::default());
        let mut workflow = workflow_with(service.clone(), store.clone());

        workflow.select_file(csv());
        workflow.submit();
        assert_eq!(wait(&mut workflow), Completion::Succeeded);

        assert_eq!(workflow.state(), UploadState::Succeeded);
        assert!(matches!(&workflow.task, SubmitTask::Resolved));
        assert!(workflow.candidate().is_none());
        assert_eq!(store.read(), Some(sample_payload()));
        assert_eq!(service.calls(), 1);
    }

    #[test]
    fn failed_submit_leaves_store_untouched() {
        let store = Arc::new(MemoryResultStore::default());
        let mut previous = sample_payload();
        previous.historical_data[0].waste = 1.5;
        store.write(&previous).unwrap();

        let service = Arc::new(FakeService::new(server_error));
        let mut workflow = workflow_with(service, store.clone());
        workflow.select_file(csv());
        workflow.submit();

        assert_eq!(wait(&mut workflow), Completion::Failed);
        assert_eq!(workflow.state(), UploadState::Failed);
        assert!(matches!(&workflow.task, SubmitTask::Rejected));
        assert_eq!(workflow.error(), Some(UPLOAD_ERROR));
        assert_eq!(store.read(), Some(previous));
        // the file is kept so the user can try again
        assert!(workflow.can_submit());
    }

    #[test]
    fn second_submit_while_in_flight_is_a_no_op() {
        let (service, open) = FakeService::gated(ok_payload);
        let service = Arc::new(service);
        let store = Arc::new(MemoryResultStore::default());
        let mut workflow = workflow_with(service.clone(), store.clone());

        workflow.select_file(csv());
        workflow.submit();
        assert_eq!(workflow.state(), UploadState::Submitting);
        assert!(!workflow.can_submit());

        workflow.submit();
        workflow.select_file(UploadCandidate::new("other.csv", vec![]));
        assert_eq!(workflow.state(), UploadState::Submitting);
        assert_eq!(workflow.candidate().map(|c| c.name.as_str()), Some("readings.csv"));
        assert_eq!(workflow.poll(), None);
        assert!(store.read().is_none());

        open.send(()).unwrap();
        assert_eq!(wait(&mut workflow), Completion::Succeeded);
        assert_eq!(service.calls(), 1);
        assert_eq!(workflow.poll(), None);
    }

    #[test]
    fn resubmit_after_failure() {
        let service = Arc::new(FakeService::new(server_error));
        let mut workflow = workflow_with(service.clone(), Arc::new(MemoryResultStore::default()));

        workflow.select_file(csv());
        workflow.submit();
        assert_eq!(wait(&mut workflow), Completion::Failed);
        workflow.submit();
        assert_eq!(workflow.state(), UploadState::Submitting);
        assert_eq!(workflow.error(), None);
        assert_eq!(wait(&mut workflow), Completion::Failed);
        assert_eq!(service.calls(), 2);
    }

    #[test]
    fn dead_worker_releases_in_flight_state() {
        let store = Arc::new(MemoryResultStore::default());
        let mut workflow = UploadWorkflow::new(Arc::new(PanickingService), store.clone());

        workflow.select_file(csv());
        workflow.submit();
        assert_eq!(wait(&mut workflow), Completion::Failed);
        assert_eq!(workflow.state(), UploadState::Failed);
        assert!(!workflow.is_submitting());
        assert!(store.read().is_none());
    }

    #[test]
    fn store_write_failure_reports_generic_error() {
        let service = Arc::new(FakeService::new(ok_payload));
        let mut workflow = UploadWorkflow::new(service, Arc::new(ReadOnlyStore));

        workflow.select_file(csv());
        workflow.submit();
        assert_eq!(wait(&mut workflow), Completion::Failed);
        assert_eq!(workflow.error(), Some(UPLOAD_ERROR));
    }

    #[test]
    fn unreadable_file_is_reported() {
        let service = Arc::new(FakeService::new(ok_payload));
        let mut workflow = workflow_with(service, Arc::new(MemoryResultStore::default()));
        workflow.select_file(csv());
        workflow.selection_failed("Could not read readings.csv".to_string());
        assert_eq!(workflow.state(), UploadState::Idle);
        assert!(workflow.candidate().is_none());
        assert_eq!(workflow.error(), Some("Could not read readings.csv"));
    }
}
