use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{PredictionRequest, PredictionResponse};
use tracing::debug;
use url::Url;

pub mod collector;
pub mod error;
pub mod orchestrator;
pub mod render;
pub mod surface;

pub use collector::{collect, InputSource, StaticInput};
pub use error::{SubmitError, TransportError, TRANSPORT_FAILURE_MESSAGE};
pub use orchestrator::{Orchestrator, SubmitOutcome, UiState};
pub use render::{ProviderCard, ResultView};
pub use surface::{PageSlots, PageSnapshot, UiSurface};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PREDICT_PATH: &str = "predict";

/// Anything that can answer a prediction request.
///
/// Implementations report transport problems only; a payload carrying an
/// `error` field is still `Ok` here and is classified by the orchestrator.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub server_url: String,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

/// `POST {server_url}/predict` over reqwest.
pub struct PredictionClient {
    http: Client,
    predict_url: Url,
    request_timeout: Duration,
}

impl PredictionClient {
    pub fn new(settings: &ClientSettings) -> Result<Self, TransportError> {
        let predict_url = predict_endpoint(&settings.server_url)?;
        let http = Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(TransportError::ClientBuild)?;
        Ok(Self {
            http,
            predict_url,
            request_timeout: settings.request_timeout,
        })
    }

    pub fn predict_url(&self) -> &Url {
        &self.predict_url
    }
}

#[async_trait]
impl PredictionBackend for PredictionClient {
    async fn predict(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionResponse, TransportError> {
        let res = self
            .http
            .post(self.predict_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|err| TransportError::from_send(err, self.request_timeout))?;

        let status = res.status();
        debug!(status = status.as_u16(), url = %self.predict_url, "prediction response");
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        res.json::<PredictionResponse>().await.map_err(|err| {
            if err.is_timeout() {
                TransportError::Timeout(self.request_timeout)
            } else {
                TransportError::Decode(err)
            }
        })
    }
}

/// Resolves `predict` against the server URL, keeping any base path.
pub fn predict_endpoint(server_url: &str) -> Result<Url, TransportError> {
    let trimmed = server_url.trim();
    let mut base = Url::parse(trimmed).map_err(|source| TransportError::InvalidEndpoint {
        url: trimmed.to_string(),
        source,
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(TransportError::UnsupportedScheme(base.scheme().to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(PREDICT_PATH)
        .map_err(|source| TransportError::InvalidEndpoint {
            url: trimmed.to_string(),
            source,
        })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
