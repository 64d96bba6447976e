// src/services/completion.rs
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, instrument};

use crate::config::{MAX_TOKENS, MODEL, PROVIDER_BASE_URL, TEMPERATURE, TOP_P};
use crate::message::ChatMessage;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("request to completion provider failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("completion provider returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("could not decode completion response: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("completion response contained no choices")]
    NoChoices,
}

#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

// `message` stays a raw JSON value so whatever the provider sends is passed
// back untouched.
#[derive(Debug, Deserialize)]
struct Choice {
    message: Value,
}

/// Chat-completions client for the hosted provider. Cheap to clone.
#[derive(Clone, Debug)]
pub struct CompletionClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl CompletionClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(PROVIDER_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    /// Sends `messages` with the fixed sampling parameters and returns the
    /// first choice's message object.
    #[instrument(skip(self, messages), fields(count = messages.len()))]
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Value, CompletionError> {
        let payload = CompletionRequest {
            model: MODEL,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            top_p: TOP_P,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(CompletionError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "completion provider rejected request");
            return Err(CompletionError::Status { status, body });
        }

        let parsed = response
            .json::<CompletionResponse>()
            .await
            .map_err(CompletionError::Decode)?;

        let first = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(CompletionError::NoChoices)?;

        debug!(message = %first.message, "received completion");
        Ok(first.message)
    }
}
