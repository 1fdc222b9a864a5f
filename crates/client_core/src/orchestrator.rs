//! Request lifecycle: Idle -> Loading -> Result | Error, one request at a time.

use std::{
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use shared::{
    error::ValidationError,
    protocol::{PredictionRequest, PredictionResponse},
};
use tracing::{debug, error, info, warn};

use crate::{
    collector::{collect, InputSource},
    error::{SubmitError, TransportError},
    render::ResultView,
    surface::UiSurface,
    PredictionBackend, DEFAULT_REQUEST_TIMEOUT,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum UiState {
    #[default]
    Idle,
    Loading,
    Result(PredictionResponse),
    Error(String),
}

impl UiState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Result(_) => "result",
            Self::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Input failed validation; the user was notified and state is unchanged.
    Invalid(ValidationError),
    /// A request was already in flight; nothing was sent.
    Ignored,
    /// The cycle finished in this terminal state.
    Completed(UiState),
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(UiState::Result(_)))
    }
}

pub struct Orchestrator {
    backend: Arc<dyn PredictionBackend>,
    surface: Arc<dyn UiSurface>,
    request_timeout: Duration,
    state: Mutex<UiState>,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn PredictionBackend>, surface: Arc<dyn UiSurface>) -> Self {
        Self::with_timeout(backend, surface, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(
        backend: Arc<dyn PredictionBackend>,
        surface: Arc<dyn UiSurface>,
        request_timeout: Duration,
    ) -> Self {
        surface.set_placeholder_visible(true);
        surface.set_loading(false);
        surface.set_submit_enabled(true);
        Self {
            backend,
            surface,
            request_timeout,
            state: Mutex::new(UiState::Idle),
        }
    }

    pub fn state(&self) -> UiState {
        self.lock_state().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, UiState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// One press of the submit trigger: read inputs, validate, then submit.
    pub async fn handle_submit(&self, input: &dyn InputSource) -> SubmitOutcome {
        match collect(input) {
            Ok(request) => self.submit(request).await,
            Err(err) => {
                info!(reason = err.code(), "submission rejected by validation");
                self.surface.notify(&err.to_string());
                SubmitOutcome::Invalid(err)
            }
        }
    }

    pub async fn submit(&self, request: PredictionRequest) -> SubmitOutcome {
        {
            let mut state = self.lock_state();
            if matches!(*state, UiState::Loading) {
                warn!("prediction already in flight; ignoring submission");
                return SubmitOutcome::Ignored;
            }
            *state = UiState::Loading;
        }
        let cycle = CycleGuard::new(self);

        info!(
            symptoms = request.symptoms.len(),
            location = %request.location,
            "requesting prediction"
        );
        self.surface.set_submit_enabled(false);
        self.surface.set_placeholder_visible(false);
        self.surface.clear_results();
        self.surface.set_loading(true);

        let result = self.request_prediction(&request).await;

        self.surface.set_loading(false);
        let next = match result {
            Ok(response) => {
                let view = ResultView::from_response(&response);
                info!(
                    predicted = %response.predicted_disease,
                    specialist = %response.specialist,
                    doctors = response.doctors.len(),
                    "prediction rendered"
                );
                self.surface.render_result(&view);
                UiState::Result(response)
            }
            Err(err) => {
                match &err {
                    SubmitError::Logical(message) => {
                        warn!(%message, "prediction service reported an error")
                    }
                    other => error!("prediction request failed: {other}"),
                }
                let message = err.user_message();
                self.surface.render_error(&message);
                UiState::Error(message)
            }
        };

        debug!(state = next.name(), "request cycle finished");
        cycle.complete(next.clone());
        SubmitOutcome::Completed(next)
    }

    async fn request_prediction(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, SubmitError> {
        let mut response =
            match tokio::time::timeout(self.request_timeout, self.backend.predict(request)).await
            {
                Ok(result) => result?,
                Err(_) => return Err(TransportError::Timeout(self.request_timeout).into()),
            };

        if let Some(message) = response.error.take() {
            return Err(SubmitError::Logical(message));
        }
        Ok(response)
    }
}

/// Owns the Loading state for one cycle.
///
/// Dropped without [`CycleGuard::complete`] means the submit future was
/// cancelled mid-request: the page goes back to Idle so the next press runs.
struct CycleGuard<'a> {
    orchestrator: &'a Orchestrator,
    completed: bool,
}

impl<'a> CycleGuard<'a> {
    fn new(orchestrator: &'a Orchestrator) -> Self {
        Self {
            orchestrator,
            completed: false,
        }
    }

    /// Stores the terminal state, then hands the trigger back to the user.
    fn complete(mut self, next: UiState) {
        *self.orchestrator.lock_state() = next;
        self.orchestrator.surface.set_submit_enabled(true);
        self.completed = true;
    }
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        if self.completed {
            return;
        }
        warn!("prediction request cancelled before completion; returning to idle");
        *self.orchestrator.lock_state() = UiState::Idle;
        let surface = &self.orchestrator.surface;
        surface.set_loading(false);
        surface.clear_results();
        surface.set_placeholder_visible(true);
        surface.set_submit_enabled(true);
    }
}

#[cfg(test)]
#[path = "tests/orchestrator_tests.rs"]
mod tests;
