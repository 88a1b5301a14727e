//! Recursive summarization of diffs that exceed the model's context budget.

use diffscribe_llm::{Backend, Llm, LlmError};

use crate::chunk;
use crate::prompt::{CHUNK_SUMMARY_PROMPT, CONDENSE_PROMPT};

/// Heading that separates the headline from retained chunk summaries.
const DETAIL_HEADING: &str = "## More Detail";

/// Produce a commit message for `diff`.
///
/// The simple case is one request: prompt plus diff under the budget. Over
/// budget, the diff is summarized chunk by chunk, the summaries are condensed
/// until the prompt fits, and the final message is the model's answer over
/// the condensed summary followed by the retained detail sections.
pub fn commit_message<B: Backend>(
    llm: &Llm<B>,
    diff: &str,
    prompt: &str,
) -> Result<String, LlmError> {
    let budget = llm.max_tokens();
    let direct = format!("{prompt}{diff}");
    let tcount = llm.num_tokens(&direct);
    tracing::info!(tokens = tcount, budget, "commit message request");

    if tcount <= budget {
        return llm.ask(&direct);
    }

    tracing::warn!(
        tokens = tcount,
        budget,
        "diff exceeds context budget, summarizing"
    );
    let mut summaries = summarize(llm, diff, 0, CHUNK_SUMMARY_PROMPT)?;

    let mut sections = vec![DETAIL_HEADING.to_owned()];
    sections.extend(summaries.iter().cloned());
    let mut overall = summaries.join("\n\n");

    // Summaries of a very large diff can themselves exceed the budget;
    // condense until the commit prompt fits, keeping each round's list
    // ahead of the more detailed ones.
    while llm.num_tokens(&format!("{prompt}{overall}")) > budget {
        summaries = summarize(llm, &overall, 0, CONDENSE_PROMPT)?;
        let mut next = summaries.clone();
        next.push(DETAIL_HEADING.to_owned());
        next.extend(sections);
        sections = next;
        overall = summaries.join("\n\n");
    }

    let headline = llm.ask(&format!("{prompt}{overall}"))?;
    let mut message = vec![headline];
    message.extend(sections);
    Ok(message.join("\n\n"))
}

/// Summarize `text` into one reply per token-budgeted chunk.
///
/// `level` selects the boundary cascade entry to split at; chunks that are
/// still too large recurse one level deeper. Past the cascade the text is
/// halved by characters, so recursion always terminates.
pub fn summarize<B: Backend>(
    llm: &Llm<B>,
    text: &str,
    level: usize,
    prompt: &str,
) -> Result<Vec<String>, LlmError> {
    let budget = llm.max_tokens();
    let query = format!("{prompt}{text}");
    if llm.num_tokens(&query) <= budget {
        return Ok(vec![llm.ask(&query)?]);
    }

    let pieces = if level < chunk::boundary_count() {
        chunk::split_level(text, level)
    } else {
        chunk::split_halves(text)
    };

    let mut summaries = Vec::new();
    let mut chunk_pieces: Vec<&str> = Vec::new();
    let mut chunk_tokens = 0;

    for piece in &pieces {
        let piece_tokens = llm.num_tokens(piece);
        if !chunk_pieces.is_empty() && chunk_tokens + piece_tokens >= budget {
            flush_chunk(llm, &mut summaries, &chunk_pieces, level, prompt)?;
            chunk_pieces.clear();
            chunk_tokens = 0;
        }
        chunk_pieces.push(piece.as_str());
        chunk_tokens += piece_tokens;
    }
    if !chunk_pieces.is_empty() {
        flush_chunk(llm, &mut summaries, &chunk_pieces, level, prompt)?;
    }

    Ok(summaries)
}

fn flush_chunk<B: Backend>(
    llm: &Llm<B>,
    summaries: &mut Vec<String>,
    pieces: &[&str],
    level: usize,
    prompt: &str,
) -> Result<(), LlmError> {
    let text = pieces.concat();
    let query = format!("{prompt}{text}");
    if llm.num_tokens(&query) > llm.max_tokens() {
        // A single piece can exceed the budget on its own; split finer.
        summaries.extend(summarize(llm, &text, level + 1, prompt)?);
    } else {
        summaries.push(llm.ask(&query)?);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use diffscribe_llm::{LlmError, ModelKind};

    use super::*;
    use crate::prompt;

    const COMMIT: &str = "commit: ";
    const SUMMARIZE: &str = "summarize: ";

    type Recorded = Rc<RefCell<Vec<String>>>;

    /// Deterministic backend: whitespace token counting, configurable
    /// budget, replies keyed off the prompt family.
    struct FakeBackend {
        budget: usize,
        asked: Recorded,
        /// Reply used for first-round chunk summaries.
        chunk_reply: String,
    }

    impl FakeBackend {
        fn new(budget: usize, asked: Recorded) -> Self {
            Self {
                budget,
                asked,
                chunk_reply: "- changed a widget".to_owned(),
            }
        }
    }

    impl Backend for FakeBackend {
        fn model(&self) -> ModelKind {
            ModelKind::Gpt35Turbo
        }

        fn complete(&self, request: &str) -> Result<String, LlmError> {
            self.asked.borrow_mut().push(request.to_owned());
            if request.starts_with(COMMIT) {
                Ok("Fix widget handling".to_owned())
            } else if request.starts_with(prompt::CONDENSE_PROMPT) {
                Ok("- condensed".to_owned())
            } else {
                // CHUNK_SUMMARY_PROMPT or the test-local SUMMARIZE prompt.
                Ok(self.chunk_reply.clone())
            }
        }

        fn num_tokens(&self, text: &str) -> usize {
            text.split_whitespace().count()
        }

        fn max_tokens(&self) -> usize {
            self.budget
        }
    }

    fn recorded() -> Recorded {
        Rc::new(RefCell::new(Vec::new()))
    }

    /// Two files, 44 whitespace tokens each (header 4, ten 4-token lines).
    fn two_file_diff() -> String {
        let mut diff = String::new();
        for file in ["alpha", "beta"] {
            diff.push_str(&format!("diff --git a/{file}.rs b/{file}.rs\n"));
            for line in 0..10 {
                diff.push_str(&format!("+added {file} line {line}\n"));
            }
        }
        diff
    }

    #[test]
    fn short_diff_is_one_direct_request() {
        let asked = recorded();
        let llm = Llm::new(FakeBackend::new(1000, asked.clone()));

        let message = commit_message(&llm, "+one line\n", COMMIT).expect("message");
        assert_eq!(message, "Fix widget handling");

        let asked = asked.borrow();
        assert_eq!(asked.len(), 1);
        assert!(asked[0].starts_with("commit: +one line"));
    }

    #[test]
    fn oversized_diff_gets_headline_and_detail_sections() {
        // Budget below the diff (88 tokens) but big enough for each file
        // chunk (44) plus the chunk-summary prompt (13).
        let llm = Llm::new(FakeBackend::new(60, recorded()));
        let message = commit_message(&llm, &two_file_diff(), COMMIT).expect("message");

        let sections: Vec<&str> = message.split("\n\n").collect();
        assert_eq!(sections[0], "Fix widget handling");
        assert_eq!(sections[1], "## More Detail");
        assert_eq!(sections[2..], ["- changed a widget", "- changed a widget"]);
    }

    #[test]
    fn chunks_split_on_file_boundaries() {
        let asked = recorded();
        let llm = Llm::new(FakeBackend::new(60, asked.clone()));

        let summaries =
            summarize(&llm, &two_file_diff(), 0, SUMMARIZE).expect("summaries");
        assert_eq!(summaries.len(), 2, "one summary per file chunk");

        for request in asked.borrow().iter() {
            let chunk = request.strip_prefix(SUMMARIZE).expect("prompt prefix");
            assert!(
                chunk.starts_with("diff --git"),
                "chunk should start at a file header: {chunk:?}"
            );
        }
    }

    #[test]
    fn every_piece_lands_in_exactly_one_chunk() {
        let asked = recorded();
        let llm = Llm::new(FakeBackend::new(60, asked.clone()));
        let diff = two_file_diff();

        summarize(&llm, &diff, 0, SUMMARIZE).expect("summaries");

        let reassembled: String = asked
            .borrow()
            .iter()
            .map(|request| request.strip_prefix(SUMMARIZE).expect("prefix").to_owned())
            .collect();
        assert_eq!(reassembled, diff, "no trailing chunk may be dropped");
    }

    #[test]
    fn single_long_line_falls_back_to_halving() {
        let line = "+word ".repeat(40);
        let llm = Llm::new(FakeBackend::new(25, recorded()));

        let summaries = summarize(&llm, &line, 0, SUMMARIZE).expect("summaries");
        assert!(summaries.len() >= 2, "halving must produce multiple chunks");
    }

    #[test]
    fn over_budget_summaries_are_condensed_before_the_headline() {
        // Wordy chunk summaries (32 tokens each) so the joined first round
        // exceeds the budget and forces one condense pass.
        let mut backend = FakeBackend::new(60, recorded());
        backend.chunk_reply = "- changed a widget in many long words ".repeat(4);
        let llm = Llm::new(backend);

        let message = commit_message(&llm, &two_file_diff(), COMMIT).expect("message");

        let sections: Vec<&str> = message.split("\n\n").collect();
        assert_eq!(sections[0], "Fix widget handling");
        assert_eq!(sections[1], "- condensed");
        let divider = sections
            .iter()
            .position(|s| *s == "## More Detail")
            .expect("detail divider");
        assert!(
            divider > 1,
            "condensed list must come before the detail sections"
        );
        assert!(
            sections[divider + 1..]
                .iter()
                .any(|s| s.starts_with("- changed a widget")),
            "first-round summaries must be retained as detail"
        );
    }
}
