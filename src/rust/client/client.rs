use std::future::Future;

use log::{debug, info, warn};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::Url;

use super::error::ClientError;
use super::result::PredictionResult;
use crate::config::{ClientConfig, ConfigError};
use crate::features::{FeatureVector, PredictionRequest};

/// Anything that can turn a validated request into a prediction.
///
/// [`PredictionClient`] is the HTTP implementation. The state machine only
/// depends on this trait, which is where tests substitute their own.
pub trait Predictor {
    /// Issues exactly one prediction call for `request`
    fn predict(&self, request: &PredictionRequest) -> impl Future<Output = Result<PredictionResult, ClientError>>;
}

/// HTTP client for the classification service's `POST /api/predict`.
///
/// Each call makes exactly one request. There is no retry, debounce or cache,
/// and no timeout unless one was set in [`ClientConfig::timeout`].
///
/// ```no_run
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// use iris_predict::{ClientConfig, FeatureVector, PredictionClient};
///
/// let client = PredictionClient::new(&ClientConfig::from_env())?;
/// let result = client.submit(&FeatureVector::default()).await?;
/// println!("Predicted species: {}", result.species);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PredictionClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl PredictionClient {
    /// Creates a client for the service described by `config`
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let endpoint = config.predict_url()?;

        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        info!("Prediction endpoint: {}", endpoint);
        Ok(Self { http, endpoint })
    }

    /// The resolved `.../api/predict` URL
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Validates `vector` and, only if it is complete, sends it for prediction.
    ///
    /// # Returns
    /// * `ValidationError` if any field is unset, non-finite or negative (no request is made)
    /// * `NetworkError` if no response was obtained
    /// * `HttpError` if the status is outside 200-299
    /// * `DecodeError` if a 2xx body is not a prediction
    pub async fn submit(&self, vector: &FeatureVector) -> Result<PredictionResult, ClientError> {
        let request = vector.validate().map_err(ClientError::ValidationError)?;
        self.predict(&request).await
    }

    async fn post(&self, request: &PredictionRequest) -> Result<PredictionResult, ClientError> {
        debug!("POST {} {:?}", self.endpoint, request);
        let response = self
            .http
            .post(self.endpoint.clone())
            .header(ACCEPT, "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        debug!("Prediction response status: {}", status);
        if !status.is_success() {
            return Err(ClientError::HttpError { status_code: status.as_u16() });
        }

        let body = response.bytes().await?;
        let result: PredictionResult = serde_json::from_slice(&body)?;
        Ok(result)
    }
}

impl Predictor for PredictionClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ClientError> {
        match self.post(request).await {
            Ok(result) => {
                info!("Predicted species: {}", result.species);
                Ok(result)
            }
            Err(e) => {
                warn!("Prediction failed: {}", e);
                Err(e)
            }
        }
    }
}
