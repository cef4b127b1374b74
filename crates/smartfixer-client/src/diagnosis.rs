//! Diagnosis state machine.
//!
//! `Idle → Loading → Success | Error`, with `reset` and `cancel` returning to
//! `Idle` from anywhere. All transitions go through a single private setter and
//! are published on a watch channel; UI code observes them via
//! [`DiagnosisMachine::subscribe`].
//!
//! A submission runs as one spawned task: prepare the image, call the API,
//! store the past fix, publish the outcome. The record is written only after a
//! successful reply, and before `Success` becomes visible.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use smartfixer_net::{DiagnosisApi, NetError};
use smartfixer_shared::{prepare_image, Category, DiagnosisRequest, DiagnosisResult, ImageAttachment};
use smartfixer_store::database::lock;
use smartfixer_store::{NewPastFix, SharedDatabase};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "camelCase")]
pub enum DiagnosisState {
    Idle,
    Loading,
    Success(DiagnosisResult),
    Error(String),
}

impl DiagnosisState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Default)]
struct Inner {
    in_flight: Option<CancellationToken>,
    selected_image: Option<PathBuf>,
    last_category: Option<String>,
}

struct Shared {
    api: Arc<dyn DiagnosisApi>,
    db: SharedDatabase,
    state: watch::Sender<DiagnosisState>,
    inner: Mutex<Inner>,
}

/// Cheap to clone; clones drive the same machine.
#[derive(Clone)]
pub struct DiagnosisMachine {
    shared: Arc<Shared>,
}

impl DiagnosisMachine {
    pub fn new(api: Arc<dyn DiagnosisApi>, db: SharedDatabase) -> Self {
        let (state, _) = watch::channel(DiagnosisState::Idle);
        Self {
            shared: Arc::new(Shared {
                api,
                db,
                state,
                inner: Mutex::new(Inner::default()),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<DiagnosisState> {
        self.shared.state.subscribe()
    }

    pub fn state(&self) -> DiagnosisState {
        self.shared.state.borrow().clone()
    }

    pub fn select_image(&self, path: impl Into<PathBuf>) {
        self.shared.inner().selected_image = Some(path.into());
    }

    pub fn clear_image(&self) {
        self.shared.inner().selected_image = None;
    }

    pub fn selected_image(&self) -> Option<PathBuf> {
        self.shared.inner().selected_image.clone()
    }

    /// Category of the most recent successful diagnosis.
    pub fn last_category(&self) -> Option<String> {
        self.shared.inner().last_category.clone()
    }

    /// Directory category to pre-select after a diagnosis.
    pub fn suggested_category(&self) -> Category {
        self.last_category()
            .map(|label| Category::from_label(&label))
            .unwrap_or(Category::General)
    }

    /// Start a diagnosis. Must be called from within a tokio runtime.
    ///
    /// Returns the handle of the spawned task; awaiting it is optional.
    pub fn submit(
        &self,
        description: &str,
        image: Option<PathBuf>,
    ) -> Result<JoinHandle<()>, ClientError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ClientError::EmptyDescription);
        }

        let token = {
            let mut inner = self.shared.inner();
            if inner.in_flight.is_some() {
                return Err(ClientError::Busy);
            }
            let token = CancellationToken::new();
            inner.in_flight = Some(token.clone());
            self.shared.transition(DiagnosisState::Loading);
            token
        };

        info!(
            description_len = description.len(),
            with_image = image.is_some(),
            "diagnosis started"
        );

        let shared = Arc::clone(&self.shared);
        let description = description.to_string();
        Ok(tokio::spawn(shared.run(description, image, token)))
    }

    /// Start a diagnosis with the currently selected image, if any.
    pub fn submit_with_selection(&self, description: &str) -> Result<JoinHandle<()>, ClientError> {
        let image = self.selected_image();
        self.submit(description, image)
    }

    /// Abort the in-flight diagnosis, if any, and go back to `Idle`.
    /// The image selection is kept. Returns whether anything was cancelled.
    pub fn cancel(&self) -> bool {
        let mut inner = self.shared.inner();
        let Some(token) = inner.in_flight.take() else {
            return false;
        };
        token.cancel();
        self.shared.transition(DiagnosisState::Idle);
        info!("diagnosis cancelled");
        true
    }

    /// Return to `Idle` from any state, dropping the image selection and
    /// cancelling an in-flight diagnosis.
    pub fn reset(&self) {
        let mut inner = self.shared.inner();
        if let Some(token) = inner.in_flight.take() {
            token.cancel();
        }
        inner.selected_image = None;
        self.shared.transition(DiagnosisState::Idle);
    }
}

impl Shared {
    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // Callers hold the `inner` lock so state and bookkeeping change together.
    fn transition(&self, next: DiagnosisState) {
        debug!(from = self.state.borrow().label(), to = next.label(), "diagnosis state");
        self.state.send_replace(next);
    }

    async fn run(self: Arc<Self>, description: String, image: Option<PathBuf>, token: CancellationToken) {
        let outcome = tokio::select! {
            _ = token.cancelled() => return,
            outcome = self.request(description, image) => outcome,
        };

        match outcome {
            Ok(result) => {
                if token.is_cancelled() {
                    return;
                }
                self.persist(&result).await;
                let category = result.category.clone();
                self.finish(&token, DiagnosisState::Success(result), Some(category));
            }
            Err(e) => {
                warn!(error = %e, "diagnosis failed");
                self.finish(&token, DiagnosisState::Error(e.to_string()), None);
            }
        }
    }

    async fn request(
        &self,
        description: String,
        image: Option<PathBuf>,
    ) -> Result<DiagnosisResult, NetError> {
        let mut request = DiagnosisRequest::text(description);
        if let Some(path) = image {
            request.image = attachment_from(path).await;
        }
        self.api.diagnose(&request).await
    }

    async fn persist(&self, result: &DiagnosisResult) {
        let record = NewPastFix::from_result(result);
        let db = Arc::clone(&self.db);

        let saved = tokio::task::spawn_blocking(move || lock(&db)?.insert_past_fix(&record)).await;
        match saved {
            Ok(Ok(id)) => info!(id, title = %result.title, "diagnosis saved to history"),
            Ok(Err(e)) => error!(error = %e, "failed to save diagnosis, showing result anyway"),
            Err(e) => error!(error = %e, "history write task failed, showing result anyway"),
        }
    }

    fn finish(&self, token: &CancellationToken, next: DiagnosisState, category: Option<String>) {
        let mut inner = self.inner();
        if token.is_cancelled() {
            return;
        }
        inner.in_flight = None;
        if category.is_some() {
            inner.last_category = category;
        }
        self.transition(next);
    }
}

impl DiagnosisState {
    fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Success(_) => "success",
            Self::Error(_) => "error",
        }
    }
}

/// Image preparation is CPU-bound, so it runs on the blocking pool. Any
/// failure degrades to sending the request without a photo.
async fn attachment_from(path: PathBuf) -> Option<ImageAttachment> {
    match tokio::task::spawn_blocking(move || prepare_image(&path)).await {
        Ok(prepared) => prepared.map(ImageAttachment::from),
        Err(e) => {
            warn!(error = %e, "image preparation task failed");
            None
        }
    }
}
