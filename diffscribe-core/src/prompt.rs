//! Prompt text used by the commit-message pipeline.

/// Placed in front of the diff (or its condensed summary).
pub const COMMIT_PROMPT: &str = "Write a git commit message for the following. \
The message starts with a one-line summary of 60 characters, followed by a \
blank line, followed by a longer but concise description of the change.\n\n";

/// Asks for a bullet list of the effects of every change in a diff chunk.
pub const CHUNK_SUMMARY_PROMPT: &str =
    "Make an unordered list of the effects of every change in this diff.\n\n";

/// Asks to condense prose summaries that are still over budget.
pub const CONDENSE_PROMPT: &str =
    "Make an unordered list that summarizes the changes described below.\n\n";
