use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::gateway::GatewayError;

/// JSON body sent to the inference endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    pub inputs: String,
    pub parameters: InferenceParameters,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceParameters {
    pub max_length: u32,
    pub temperature: f32,
    pub do_sample: bool,
}

/// Status and raw body of a completed HTTP exchange.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The wire seam under `AiGateway`. Only network-level failures are errors here;
/// non-2xx statuses come back as a `TransportResponse` for the gateway to judge.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    async fn post(
        &self,
        url: &str,
        api_key: &str,
        request: &InferenceRequest,
    ) -> Result<TransportResponse, GatewayError>;
}

/// reqwest-backed transport. Uses the client defaults: no timeout, no retry.
#[derive(Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InferenceTransport for HttpTransport {
    async fn post(
        &self,
        url: &str,
        api_key: &str,
        request: &InferenceRequest,
    ) -> Result<TransportResponse, GatewayError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("transport error: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::RequestFailed(format!("failed to read body: {e}")))?;

        Ok(TransportResponse { status, body })
    }
}
