//! Error types for diffscribe-llm.

use thiserror::Error;

/// All errors that can arise from talking to a chat backend.
#[derive(Debug, Error)]
pub enum LlmError {
    /// `OPENAI_API_KEY` was not present in the environment.
    #[error("OPENAI_API_KEY is not set")]
    MissingApiKey,

    /// Transport or HTTP-status failure from the chat endpoint.
    #[error("chat completion request failed: {0}")]
    Http(#[from] Box<ureq::Error>),

    /// The response body could not be read or decoded.
    #[error("failed to decode chat completion response: {0}")]
    Decode(#[from] std::io::Error),

    /// The API answered 200 but returned no choices.
    #[error("chat completion returned no choices")]
    EmptyResponse,
}
