use regex::Regex;
use std::sync::LazyLock;

static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("sentence pattern should be valid"));

/// Collapses every whitespace run into a single space and trims the ends.
///
/// Rendered DOM text is full of indentation and line breaks from the markup;
/// this turns `textContent`-style output into a single readable line.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

//
// Word and sentence counting
//

/// Iterates over the whitespace-separated tokens of `text`
pub fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Number of whitespace-separated tokens in `text`
pub fn count_words(text: &str) -> usize {
    words(text).count()
}

/// Total word count over a sequence of texts.
///
/// Counting per text and summing gives the same result as joining the texts
/// with a space and counting once, since empty tokens are never produced.
pub fn count_words_in<'a, I>(texts: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    texts.into_iter().map(count_words).sum()
}

/// Splits text into sentence fragments on runs of `.`, `!` and `?`,
/// dropping fragments that are empty after trimming
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

//
// Length helpers
//

/// Length in characters (not bytes)
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Returns at most `max_chars` characters of `text`, never splitting a char
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Truncates to `max_chars` and appends `...` when anything was cut
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    let head = truncate_chars(text, max_chars);
    if head.len() < text.len() {
        format!("{}...", head)
    } else {
        head.to_string()
    }
}
