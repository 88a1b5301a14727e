//! Splitting oversized diffs into pieces that pack into token budgets.
//!
//! Splitting works through a cascade of boundaries, coarsest first: per-file
//! `diff ` headers, then blank lines, then single newlines. Each boundary
//! keeps its delimiter attached to the piece that follows it, so pieces
//! remain valid diff fragments and concatenating the pieces reproduces the
//! input exactly.

use std::sync::LazyLock;

use regex::Regex;

static BOUNDARIES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?m)^diff ", r"(?m)^$", r"\n"]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("static boundary pattern"))
        .collect()
});

/// Number of boundary levels in the cascade.
pub fn boundary_count() -> usize {
    BOUNDARIES.len()
}

/// Split `text` at every boundary of the given cascade level. A level past
/// the cascade, or a text containing no boundary, comes back as one piece.
pub fn split_level(text: &str, level: usize) -> Vec<String> {
    let Some(re) = BOUNDARIES.get(level) else {
        return vec![text.to_owned()];
    };

    let mut starts: Vec<usize> = re
        .find_iter(text)
        .map(|m| m.start())
        .filter(|&start| start > 0)
        .collect();
    starts.dedup();

    let mut pieces = Vec::with_capacity(starts.len() + 1);
    let mut prev = 0;
    for start in starts {
        pieces.push(text[prev..start].to_owned());
        prev = start;
    }
    pieces.push(text[prev..].to_owned());
    pieces.retain(|piece| !piece.is_empty());
    pieces
}

/// Last-resort split for text with no usable boundary: halve at the nearest
/// character boundary. Each half is strictly smaller than the input, which
/// guarantees the summarizer's recursion terminates.
pub fn split_halves(text: &str) -> Vec<String> {
    if text.chars().count() < 2 {
        return vec![text.to_owned()];
    }
    let mut mid = text.len() / 2;
    while !text.is_char_boundary(mid) {
        mid += 1;
    }
    vec![text[..mid].to_owned(), text[mid..].to_owned()]
}
