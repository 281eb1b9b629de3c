//! Small text helpers shared by ingestion, analysis and drafting.

use std::sync::LazyLock;

use regex::Regex;

/// Separator rules (`__________`, `----------`, `==========`) left behind by PDF extraction.
static SEPARATOR_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[_\-=]{10,}").expect("separator pattern is valid")
});

/// Returns at most the first `max_chars` characters of `text`, never splitting a code point.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Normalizes extracted document text: trims lines, collapses inner whitespace,
/// drops blank lines and long separator runs.
pub fn clean_extracted_text(text: &str) -> String {
    text.lines()
        .map(|line| {
            let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
            SEPARATOR_RUN.replace_all(&collapsed, "").trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
