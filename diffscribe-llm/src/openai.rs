//! Wire-level OpenAI chat-completions backend.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::Backend;
use crate::error::LlmError;
use crate::model::ModelKind;

/// Default chat completions endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Long diffs can take the API a while; keep the read timeout generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    temperature: f32,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

// ---------------------------------------------------------------------------
// Backend
// ---------------------------------------------------------------------------

/// Chat-completion backend speaking the OpenAI HTTP API.
pub struct OpenAi {
    model: ModelKind,
    temperature: f32,
    api_key: String,
    endpoint: String,
    agent: ureq::Agent,
}

impl OpenAi {
    /// Build a backend from the environment. Fails immediately when
    /// `OPENAI_API_KEY` is missing so the user hears about it before any
    /// diff is read.
    pub fn new(model: ModelKind, temperature: f32) -> Result<Self, LlmError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| LlmError::MissingApiKey)?;
        Ok(Self {
            model,
            temperature,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            agent: ureq::AgentBuilder::new()
                .timeout_read(REQUEST_TIMEOUT)
                .build(),
        })
    }

    /// Point the backend at a different endpoint (OpenAI-compatible gateways,
    /// test servers).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

impl Backend for OpenAi {
    fn model(&self) -> ModelKind {
        self.model
    }

    fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: self.model.api_name(),
            temperature: self.temperature,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response: ChatResponse = self
            .agent
            .post(&self.endpoint)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&request)
            .map_err(Box::new)?
            .into_json()?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(LlmError::EmptyResponse)
    }
}
