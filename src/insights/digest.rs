//! Bounded text digest of a page, used as prompt input.

use crate::error::{Error, Result};
use crate::parsers::text;
use crate::results::{HeadingLevel, ScrapedData};

/// Title, non-empty heading groups and leading paragraphs of a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Digest {
    text: String,
}

impl Digest {
    /// Builds the digest from the first `max_paragraphs` paragraphs.
    ///
    /// Fails when the page has nothing to say: no title, no headings and no
    /// paragraphs.
    pub fn prepare(data: &ScrapedData, max_paragraphs: usize) -> Result<Self> {
        let mut parts = Vec::new();

        if !data.title.is_empty() {
            parts.push(format!("Title: {}", data.title));
        }

        for level in HeadingLevel::ALL {
            let headings = data
                .headings
                .level(level)
                .iter()
                .map(|h| h.trim())
                .filter(|h| !h.is_empty())
                .collect::<Vec<_>>();
            if !headings.is_empty() {
                parts.push(format!("{}: {}", level.label(), headings.join(", ")));
            }
        }

        let content = data
            .paragraphs
            .iter()
            .take(max_paragraphs)
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>();
        if !content.is_empty() {
            parts.push(format!(
                "Content: {}",
                text::normalize_whitespace(&content.join(" "))
            ));
        }

        let text = parts.join("\n\n");
        if text.trim().is_empty() {
            return Err(Error::Analysis(format!(
                "no content to analyze on {}",
                data.url
            )));
        }

        Ok(Self { text })
    }

    /// Full digest text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Digest cut to `budget` characters
    pub fn truncated(&self, budget: usize) -> &str {
        text::truncate_chars(&self.text, budget)
    }
}
