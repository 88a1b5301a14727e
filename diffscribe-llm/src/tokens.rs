//! Token counting via the cl100k BPE shared by the supported models.

use std::sync::LazyLock;

use tiktoken_rs::{cl100k_base, CoreBPE};

static ENCODER: LazyLock<CoreBPE> =
    LazyLock::new(|| cl100k_base().expect("failed to initialise cl100k tokenizer"));

/// Number of tokens `text` occupies in a chat completion request.
pub fn count(text: &str) -> usize {
    ENCODER.encode_with_special_tokens(text).len()
}
