use reqwest::Client;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

use super::ReplyEvent;
use crate::{actuators::chat::dto::ChatRequest, config::client::ClientConfig, service::HttpErrorBody};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// HTTP client for the relay's `POST /chat` endpoint.
#[derive(Debug, Clone)]
pub struct RelayApi {
    http: Client,
    base_url: Box<str>,
}

impl RelayApi {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: Client::new(),
            base_url: config.base_url.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Sends `message` and reports the reply body as it arrives, ending with
    /// exactly one `Finished` or `Failed` event.
    pub async fn stream_reply(self, message: String, events: UnboundedSender<ReplyEvent>) {
        let event = match self.forward_reply(&message, &events).await {
            Ok(()) => ReplyEvent::Finished,
            Err(error) => ReplyEvent::Failed(error.to_string()),
        };
        // A closed channel means the session is gone, nothing left to tell
        let _ = events.send(event);
    }

    async fn forward_reply(&self, message: &str, events: &UnboundedSender<ReplyEvent>) -> Result<(), ApiError> {
        let mut response = self
            .http
            .post(format!("{}/chat", self.base_url))
            .json(&ChatRequest::new(message))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The body is still shown as the reply, same as a successful one
            let body = response.text().await?;
            match serde_json::from_str::<HttpErrorBody>(&body) {
                Ok(HttpErrorBody { error }) => {
                    tracing::warn!(status = status.as_u16(), "Relay returned an error: {}", error)
                }
                Err(_) => tracing::warn!(status = status.as_u16(), "Relay returned an error: {}", body),
            }
            let _ = events.send(ReplyEvent::Chunk(body.into_bytes()));
            return Ok(());
        }

        while let Some(chunk) = response.chunk().await? {
            if events.send(ReplyEvent::Chunk(chunk.to_vec())).is_err() {
                break;
            }
        }
        Ok(())
    }
}
