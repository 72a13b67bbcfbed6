use super::config::UpstreamConfig;
use super::{ApiError, OutboundRequest};

/// Streaming client for an OpenAI-compatible chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: UpstreamConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    pub fn request_for(&self, message: &str) -> OutboundRequest {
        OutboundRequest::for_user_message(&self.config.model, self.config.temperature, message)
    }

    /// Sends the request and returns the response once its status is known
    /// to be a success. The body is left unread for the caller to stream.
    ///
    /// The timeout covers the response head and, on failure, the error body.
    pub async fn open_stream(&self, request: &OutboundRequest) -> Result<reqwest::Response, ApiError> {
        tokio::time::timeout(self.config.timeout, self.exchange(request))
            .await
            .map_err(|_| ApiError::Timeout(self.config.timeout))?
    }

    async fn exchange(&self, request: &OutboundRequest) -> Result<reqwest::Response, ApiError> {
        let response = self
            .http
            .post(&*self.config.endpoint)
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            tracing::error!(status = status.as_u16(), "API error: {}", body);
            return Err(ApiError::ErrorResponse {
                status: status.as_u16(),
                body: body.into(),
            });
        }

        Ok(response)
    }
}
