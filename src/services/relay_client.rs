// src/services/relay_client.rs
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::debug;

use crate::message::{ChatMessage, ChatReply, ChatRequest};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("could not reach relay: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("relay answered {0}")]
    Status(StatusCode),

    #[error("could not decode relay reply: {0}")]
    Decode(#[source] reqwest::Error),
}

/// HTTP client for `POST /api/chat`.
#[derive(Clone, Debug)]
pub struct RelayClient {
    http: Client,
    base_url: String,
}

impl RelayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    pub async fn send(&self, messages: Vec<ChatMessage>) -> Result<ChatReply, RelayError> {
        let body = ChatRequest { messages: Some(messages) };
        let response = self
            .http
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(RelayError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status(status));
        }

        let reply = response.json::<ChatReply>().await.map_err(RelayError::Decode)?;
        debug!(role = ?reply.role, "relay replied");
        Ok(reply)
    }
}
