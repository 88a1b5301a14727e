//! Caching wrapper around a chat backend.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::error::LlmError;
use crate::model::ModelKind;
use crate::tokens;

/// A chat-completion backend: one prompt in, one reply out.
pub trait Backend {
    fn model(&self) -> ModelKind;

    fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Token count used for budget decisions. The default uses the cl100k
    /// BPE so budget checks agree with what the API will count.
    fn num_tokens(&self, text: &str) -> usize {
        tokens::count(text)
    }

    /// Context budget for this backend's model.
    fn max_tokens(&self) -> usize {
        self.model().max_tokens()
    }
}

/// Wraps a backend with an in-process response cache and counters.
///
/// The recursive summarizer can revisit identical chunks; the cache keeps
/// those from turning into duplicate paid requests.
pub struct Llm<B> {
    backend: B,
    cache: RefCell<HashMap<String, String>>,
    requests: Cell<usize>,
    cache_hits: Cell<usize>,
}

impl<B: Backend> Llm<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            cache: RefCell::new(HashMap::new()),
            requests: Cell::new(0),
            cache_hits: Cell::new(0),
        }
    }

    pub fn model(&self) -> ModelKind {
        self.backend.model()
    }

    pub fn max_tokens(&self) -> usize {
        self.backend.max_tokens()
    }

    pub fn num_tokens(&self, text: &str) -> usize {
        self.backend.num_tokens(text)
    }

    /// Send `prompt` to the backend, serving repeats from cache.
    pub fn ask(&self, prompt: &str) -> Result<String, LlmError> {
        if let Some(hit) = self.cache.borrow().get(prompt) {
            self.cache_hits.set(self.cache_hits.get() + 1);
            return Ok(hit.clone());
        }

        tracing::debug!(tokens = self.num_tokens(prompt), "sending prompt");
        let reply = self.backend.complete(prompt)?;
        self.requests.set(self.requests.get() + 1);
        self.cache
            .borrow_mut()
            .insert(prompt.to_owned(), reply.clone());
        Ok(reply)
    }

    /// Human-readable request/cache counters for the end-of-run line.
    pub fn counter_string(&self) -> String {
        format!(
            "{} requests, {} cache hits",
            self.requests.get(),
            self.cache_hits.get()
        )
    }
}
