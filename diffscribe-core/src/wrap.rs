//! Final output formatting.

/// Wrap each line of `text` to `width` columns, preserving blank lines.
pub fn wrap_paragraphs(text: &str, width: usize) -> String {
    text.lines()
        .map(|line| textwrap::wrap(line, width).join("\n"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_lines_are_wrapped() {
        let text = "one two three four five six";
        let wrapped = wrap_paragraphs(text, 13);
        assert_eq!(wrapped, "one two three\nfour five six");
    }

    #[test]
    fn blank_lines_are_preserved() {
        let text = "Fix the loader\n\nLonger description here.";
        let wrapped = wrap_paragraphs(text, 70);
        assert_eq!(wrapped, text);
    }

    #[test]
    fn short_lines_pass_through() {
        assert_eq!(wrap_paragraphs("short", 70), "short");
    }
}
