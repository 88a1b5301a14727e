//! Diff summarization core for diffscribe.
//!
//! A diff that fits the model's context budget becomes one request. One that
//! does not is split along diff structure, summarized chunk by chunk, and
//! condensed until the commit prompt fits.

pub mod chunk;
pub mod prompt;
pub mod summarize;
pub mod wrap;

pub use summarize::commit_message;
