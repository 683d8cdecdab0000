use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Body of a single generate call. `stream` is always `false`.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct PromptRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
}

impl PromptRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: false,
        }
    }
}

/// Decoded server reply. Only the `response` field is read.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct PromptResponse {
    #[serde(rename = "response")]
    pub text: String,
}

impl PromptResponse {
    pub fn from_json(body: &str) -> Result<Self, ClientError> {
        serde_json::from_str(body).map_err(|e| ClientError::Decode {
            reason: e.to_string(),
        })
    }
}

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ClientError {
    #[error("network: {0}")]
    Network(String),
    #[error("Ollama API error: {status} - {body_snippet}")]
    Protocol { status: u16, body_snippet: String },
    #[error("decode: {reason}")]
    Decode { reason: String },
    #[error("empty input")]
    EmptyInput,
}

impl ClientError {
    /// Text shown verbatim as a system notice in the transcript.
    pub fn notice(&self) -> String {
        format!("Error: {}", self)
    }
}

/// Caller-side guard run before `send`: returns the trimmed prompt.
pub fn require_prompt(text: &str) -> Result<&str, ClientError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ClientError::EmptyInput);
    }
    Ok(trimmed)
}

/// One prompt in, one typed outcome out. Implementations hold no per-call state.
pub trait PromptClient: Send + Sync {
    fn send(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<PromptResponse, ClientError>> + Send;
}
