//! AI Gateway: the single point of entry for calls to the text-generation provider.
//!
//! Request shaping and response normalization for the provider live here and
//! nowhere else. Failures are returned as `GatewayError` values. Nothing is
//! retried and no timeout is set beyond the transport default.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod handlers;
pub mod prompts;
pub mod transport;

use crate::gateway::transport::{InferenceParameters, InferenceRequest, InferenceTransport};

const DEFAULT_MAX_LENGTH: u32 = 200;
const DEFAULT_TEMPERATURE: f32 = 0.7;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GatewayError {
    #[error("AI request failed: {0}")]
    RequestFailed(String),

    #[error("AI provider returned no text")]
    EmptyResponse,
}

/// Generation knobs forwarded as `parameters` in the request body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub max_length: u32,
    /// Clamped to 0.0–1.0 before sending.
    pub temperature: f32,
    pub sample: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            temperature: DEFAULT_TEMPERATURE,
            sample: true,
        }
    }
}

impl GenerateOptions {
    fn to_parameters(self) -> InferenceParameters {
        let temperature = if self.temperature.is_finite() {
            self.temperature.clamp(0.0, 1.0)
        } else {
            DEFAULT_TEMPERATURE
        };
        InferenceParameters {
            max_length: self.max_length,
            temperature,
            do_sample: self.sample,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedText {
    pub text: String,
}

/// One item of a candidate list returned by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub generated_text: Option<String>,
}

/// The provider answers with a candidate list, an error object, or anything
/// else. Parsed once here so callers only ever see `GeneratedText`.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderResponse {
    Candidates(Vec<Candidate>),
    Raw(String),
    Error(String),
}

impl ProviderResponse {
    pub fn from_body(body: &str) -> Self {
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Array(items)) => ProviderResponse::Candidates(
                items
                    .iter()
                    .map(|item| Candidate {
                        generated_text: item
                            .get("generated_text")
                            .and_then(Value::as_str)
                            .map(str::to_owned),
                    })
                    .collect(),
            ),
            Ok(Value::Object(map)) if map.contains_key("error") => {
                let message = match &map["error"] {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                ProviderResponse::Error(message)
            }
            Ok(Value::String(text)) => ProviderResponse::Raw(text),
            _ => ProviderResponse::Raw(body.to_string()),
        }
    }

    pub fn into_text(self) -> Result<GeneratedText, GatewayError> {
        let text = match self {
            ProviderResponse::Candidates(candidates) => candidates
                .into_iter()
                .next()
                .and_then(|c| c.generated_text)
                .unwrap_or_default(),
            ProviderResponse::Raw(text) => text,
            ProviderResponse::Error(message) => return Err(GatewayError::RequestFailed(message)),
        };
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        Ok(GeneratedText { text })
    }
}

/// Per-session adapter around the inference endpoint `<base_url>/<model>`.
#[derive(Clone)]
pub struct AiGateway {
    transport: Arc<dyn InferenceTransport>,
    endpoint: String,
    api_key: Option<String>,
}

impl fmt::Debug for AiGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiGateway")
            .field("endpoint", &self.endpoint)
            .field("configured", &self.api_key.is_some())
            .finish()
    }
}

impl AiGateway {
    pub fn new(transport: Arc<dyn InferenceTransport>, base_url: &str, model: &str) -> Self {
        Self {
            transport,
            endpoint: format!("{}/{}", base_url.trim_end_matches('/'), model),
            api_key: None,
        }
    }

    /// Stores the credential for later calls. Not validated until first use.
    pub fn configure(&mut self, api_key: impl Into<String>) {
        let api_key = api_key.into();
        self.api_key = if api_key.trim().is_empty() {
            None
        } else {
            Some(api_key)
        };
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends `prompt` as-is. An empty prompt short-circuits to `EmptyResponse`.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerateOptions,
    ) -> Result<GeneratedText, GatewayError> {
        if prompt.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        self.send(prompt.to_string(), options).await
    }

    /// Asks for improvement suggestions on the first 500 characters of `text`.
    pub async fn analyze(
        &self,
        text: &str,
        options: &GenerateOptions,
    ) -> Result<GeneratedText, GatewayError> {
        if text.trim().is_empty() {
            return Err(GatewayError::EmptyResponse);
        }
        self.send(prompts::analyze_prompt(text), options).await
    }

    async fn send(
        &self,
        inputs: String,
        options: &GenerateOptions,
    ) -> Result<GeneratedText, GatewayError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GatewayError::RequestFailed("API key not configured".to_string()))?;

        let request = InferenceRequest {
            inputs,
            parameters: options.to_parameters(),
        };

        let response = self
            .transport
            .post(&self.endpoint, api_key, &request)
            .await
            .inspect_err(|e| warn!("Inference call to {} failed: {e}", self.endpoint))?;

        if !response.is_success() {
            let detail = match ProviderResponse::from_body(&response.body) {
                ProviderResponse::Error(message) => message,
                _ => response.body.clone(),
            };
            warn!("Inference API returned {}: {}", response.status, detail);
            return Err(GatewayError::RequestFailed(format!(
                "provider returned status {}: {detail}",
                response.status
            )));
        }

        let result = ProviderResponse::from_body(&response.body).into_text();
        match &result {
            Ok(generated) => debug!("Inference call succeeded: {} chars", generated.text.len()),
            Err(e) => warn!("Inference call produced no usable text: {e}"),
        }
        result
    }
}
