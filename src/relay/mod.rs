//! Chat relay client
//!
//! The relay is an HTTP endpoint that forwards the transcript to a language
//! model. It speaks a trimmed-down chat completions format:
//!
//! ```json
//! // request
//! { "messages": [ { "role": "system", "content": "..." } ] }
//! // response
//! { "choices": [ { "message": { "content": "..." } } ] }
//! ```
//!
//! Every failure, whether transport, status, or payload shape, is reported
//! as a `RelayError`. There is one attempt per call; no retry, no timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::conversation::Message;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Anything that can turn a transcript into an assistant reply
#[async_trait]
pub trait ChatRelay: Send + Sync {
    async fn send(&self, messages: &[Message]) -> Result<String, RelayError>;
}

#[derive(Debug, Serialize)]
struct RelayRequest<'a> {
    messages: &'a [Message],
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Relay reached over HTTP POST
pub struct HttpRelay {
    client: Client,
    url: String,
}

impl HttpRelay {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl ChatRelay for HttpRelay {
    async fn send(&self, messages: &[Message]) -> Result<String, RelayError> {
        tracing::debug!("Sending {} message(s) to relay", messages.len());

        let response = self
            .client
            .post(&self.url)
            .json(&RelayRequest { messages })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RelayError::InvalidResponse(format!("HTTP {}: {}", status, body)));
        }

        parse_completion(&body)
    }
}

/// Extract `choices[0].message.content`, which must be non-empty
pub fn parse_completion(body: &str) -> Result<String, RelayError> {
    let completion: RelayResponse = serde_json::from_str(body).map_err(|e| {
        RelayError::InvalidResponse(format!("Failed to parse response: {} - Body: {}", e, body))
    })?;

    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or_else(|| RelayError::InvalidResponse("No completion content in response".to_string()))
}
