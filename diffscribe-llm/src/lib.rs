//! LLM access layer for diffscribe.
//!
//! [`OpenAi`] is the wire-level chat-completion backend; [`Llm`] wraps any
//! [`Backend`] with an in-process response cache and per-run counters.

pub mod client;
pub mod error;
pub mod model;
pub mod openai;
pub mod tokens;

pub use client::{Backend, Llm};
pub use error::LlmError;
pub use model::ModelKind;
pub use openai::OpenAi;
