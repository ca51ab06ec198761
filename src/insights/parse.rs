//! Parsers for free-text responses of the text-generation service.
//!
//! Every parser is total: it returns [`FieldParse::Parsed`] when the response
//! had the expected shape and [`FieldParse::Fallback`] with a default value
//! when it did not. Callers decide whether a fallback is worth a warning.

use crate::results::{Entities, Keyword, Sentiment};
use regex::Regex;
use std::sync::LazyLock;

/// Confidence reported when a sentiment response carries none
pub const DEFAULT_CONFIDENCE: u8 = 70;

static CONFIDENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)confidence:\s*(\d+)").expect("confidence pattern should be valid")
});

static KEYWORD_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•]\s*|\d+[.)]\s*)?(.+?)\s*:\s*(\d+(?:\.\d+)?)\s*%?\s*$")
        .expect("keyword pattern should be valid")
});

static IMPORTANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*importance\s*:\s*(\d+)").expect("importance pattern should be valid")
});

static LIST_BULLET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-*•]+|\d+[.)])\s*").expect("bullet pattern should be valid")
});

/// Outcome of parsing one response field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldParse<T> {
    Parsed(T),
    Fallback(T),
}

impl<T> FieldParse<T> {
    pub fn into_inner(self) -> T {
        match self {
            FieldParse::Parsed(value) | FieldParse::Fallback(value) => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FieldParse::Fallback(_))
    }
}

/// Sentiment label with its confidence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentimentReading {
    pub sentiment: Sentiment,
    pub confidence: u8,
}

/// Paragraph summary with an optional importance score
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParagraphSummary {
    pub summary: String,
    pub importance: Option<u8>,
}

/// Comma-separated list, trimmed, empties dropped, capped at `max`
pub fn comma_list(response: &str, max: usize) -> FieldParse<Vec<String>> {
    let items = response
        .split(',')
        .map(|item| strip_quotes(item.trim()))
        .filter(|item| !item.is_empty())
        .take(max)
        .map(str::to_string)
        .collect::<Vec<_>>();

    if items.is_empty() {
        FieldParse::Fallback(items)
    } else {
        FieldParse::Parsed(items)
    }
}

/// A run of digits clamped to [0, 100]; runs too long for `u64` saturate
fn percent(digits: &str) -> u8 {
    digits.parse::<u64>().unwrap_or(u64::MAX).min(100) as u8
}

/// Looks for "positive", then "negative"; anything else reads as neutral
pub fn sentiment(response: &str) -> FieldParse<SentimentReading> {
    let lower = response.to_lowercase();
    let label = if lower.contains("positive") {
        Some(Sentiment::Positive)
    } else if lower.contains("negative") {
        Some(Sentiment::Negative)
    } else if lower.contains("neutral") {
        Some(Sentiment::Neutral)
    } else {
        None
    };

    let confidence = CONFIDENCE
        .captures(response)
        .map(|caps| percent(&caps[1]));

    match label {
        Some(sentiment) => FieldParse::Parsed(SentimentReading {
            sentiment,
            confidence: confidence.unwrap_or(DEFAULT_CONFIDENCE),
        }),
        None => FieldParse::Fallback(SentimentReading {
            sentiment: Sentiment::Neutral,
            confidence: confidence.unwrap_or(DEFAULT_CONFIDENCE),
        }),
    }
}

/// Reads the `People:`, `Organizations:`, `Locations:` and `Technologies:`
/// lines. A value containing "none" is an empty list.
pub fn entities(response: &str, max_per_category: usize) -> FieldParse<Entities> {
    let mut entities = Entities::default();
    let mut labeled = 0;

    for line in response.lines() {
        let Some((label, value)) = line.split_once(':') else {
            continue;
        };
        let bucket = match strip_markup(label).to_lowercase().as_str() {
            "people" => &mut entities.people,
            "organizations" | "organisations" => &mut entities.organizations,
            "locations" => &mut entities.locations,
            "technologies" => &mut entities.technologies,
            _ => continue,
        };
        labeled += 1;

        if value.to_lowercase().contains("none") {
            bucket.clear();
            continue;
        }
        *bucket = comma_list(value, max_per_category).into_inner();
    }

    if labeled == 0 {
        FieldParse::Fallback(entities)
    } else {
        FieldParse::Parsed(entities)
    }
}

/// `keyword: relevance` lines; malformed lines are skipped
pub fn keywords(response: &str, max: usize) -> FieldParse<Vec<Keyword>> {
    let keywords = response
        .lines()
        .filter_map(|line| {
            let caps = KEYWORD_LINE.captures(line)?;
            let keyword = strip_quotes(strip_markup(&caps[1]));
            if keyword.is_empty() {
                return None;
            }
            let relevance = caps[2].parse::<f64>().ok()?.round().clamp(0.0, 100.0) as u8;
            Some(Keyword {
                keyword: keyword.to_string(),
                relevance,
            })
        })
        .take(max)
        .collect::<Vec<_>>();

    if keywords.is_empty() {
        FieldParse::Fallback(keywords)
    } else {
        FieldParse::Parsed(keywords)
    }
}

/// One item per non-empty line, list bullets stripped
pub fn insight_lines(response: &str, max: usize) -> FieldParse<Vec<String>> {
    let items = response
        .lines()
        .map(|line| LIST_BULLET.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(max)
        .collect::<Vec<_>>();

    if items.is_empty() {
        FieldParse::Fallback(items)
    } else {
        FieldParse::Parsed(items)
    }
}

/// Summary text with an optional trailing `Importance: N` line.
///
/// The fallback carries an empty summary for the caller to replace.
pub fn paragraph_summary(response: &str) -> FieldParse<ParagraphSummary> {
    let mut importance = None;
    let mut summary_lines = Vec::new();

    for line in response.lines() {
        if let Some(caps) = IMPORTANCE.captures(line) {
            importance = Some(percent(&caps[1]));
        } else if !line.trim().is_empty() {
            summary_lines.push(line.trim());
        }
    }

    let summary = summary_lines.join(" ");
    let summary = summary
        .strip_prefix("Summary:")
        .map(str::trim)
        .unwrap_or(summary.as_str())
        .to_string();

    if summary.is_empty() {
        FieldParse::Fallback(ParagraphSummary {
            summary,
            importance,
        })
    } else {
        FieldParse::Parsed(ParagraphSummary {
            summary,
            importance,
        })
    }
}

fn strip_quotes(text: &str) -> &str {
    text.trim_matches(|c| c == '"' || c == '\'').trim()
}

fn strip_markup(text: &str) -> &str {
    text.trim().trim_matches('*').trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_list() {
        let parsed = comma_list(" Rust,  async , , \"web\" ,testing", 3);
        assert_eq!(
            parsed,
            FieldParse::Parsed(vec![
                "Rust".to_string(),
                "async".to_string(),
                "web".to_string(),
            ])
        );

        let empty = comma_list("  ,  ", 7);
        assert!(empty.is_fallback());
        assert!(empty.into_inner().is_empty());
    }

    #[test]
    fn test_sentiment_labels() {
        let parsed = sentiment("Positive\nConfidence: 92").into_inner();
        assert_eq!(parsed.sentiment, Sentiment::Positive);
        assert_eq!(parsed.confidence, 92);

        let parsed = sentiment("NEGATIVE (confidence:40)").into_inner();
        assert_eq!(parsed.sentiment, Sentiment::Negative);
        assert_eq!(parsed.confidence, 40);

        // "positive" wins when both appear
        let parsed = sentiment("not negative, rather positive");
        assert_eq!(parsed.into_inner().sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_sentiment_defaults() {
        let parsed = sentiment("neutral");
        assert!(!parsed.is_fallback());
        assert_eq!(parsed.into_inner().confidence, DEFAULT_CONFIDENCE);

        let parsed = sentiment("Confidence: 250\nmixed feelings");
        assert!(parsed.is_fallback());
        let reading = parsed.into_inner();
        assert_eq!(reading.sentiment, Sentiment::Neutral);
        assert_eq!(reading.confidence, 100);
    }

    #[test]
    fn test_oversized_numbers_clamp_to_100() {
        let parsed = sentiment("positive\nConfidence: 9999999999999999999999999").into_inner();
        assert_eq!(parsed.sentiment, Sentiment::Positive);
        assert_eq!(parsed.confidence, 100);

        let parsed = paragraph_summary("Dense summary.\nImportance: 123456789012345678901234567");
        assert_eq!(parsed.into_inner().importance, Some(100));
    }

    #[test]
    fn test_entities_scenario() {
        let response = "People: Alice, Bob\nOrganizations: none\nLocations: none\nTechnologies: none";
        let parsed = entities(response, 5);
        assert!(!parsed.is_fallback());
        assert_eq!(
            parsed.into_inner(),
            Entities {
                people: vec!["Alice".to_string(), "Bob".to_string()],
                organizations: vec![],
                locations: vec![],
                technologies: vec![],
            }
        );
    }

    #[test]
    fn test_entities_cap_and_markup() {
        let response = "**People**: A, B, C, D, E, F\n\
                        Organizations: None found\n\
                        Locations: Paris\n\
                        Technologies: Rust, WebAssembly";
        let parsed = entities(response, 5).into_inner();
        assert_eq!(parsed.people.len(), 5);
        assert!(parsed.organizations.is_empty());
        assert_eq!(parsed.locations, vec!["Paris"]);
        assert_eq!(parsed.technologies, vec!["Rust", "WebAssembly"]);
    }

    #[test]
    fn test_entities_unlabeled_is_fallback() {
        let parsed = entities("I could not find anything.", 5);
        assert!(parsed.is_fallback());
        assert_eq!(parsed.into_inner(), Entities::default());
    }

    #[test]
    fn test_keywords() {
        let response = "rust: 95\n\
                        - async runtime: 80\n\
                        2. web scraping: 140\n\
                        this line is malformed\n\
                        seo: high\n\
                        \"readability\": 42.6";
        let parsed = keywords(response, 10);
        assert!(!parsed.is_fallback());
        let parsed = parsed.into_inner();

        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[0], Keyword { keyword: "rust".to_string(), relevance: 95 });
        assert_eq!(parsed[1].keyword, "async runtime");
        assert_eq!(parsed[2].relevance, 100);
        assert_eq!(parsed[3], Keyword { keyword: "readability".to_string(), relevance: 43 });
    }

    #[test]
    fn test_keywords_cap_and_fallback() {
        let response = (0..15).map(|i| format!("kw{}: {}", i, i)).collect::<Vec<_>>().join("\n");
        assert_eq!(keywords(&response, 10).into_inner().len(), 10);
        assert!(keywords("nothing useful here", 10).is_fallback());
    }

    #[test]
    fn test_insight_lines() {
        let response = "- Clear structure\n\n* Good examples\n1. Needs more depth\n2) Add sources\n• Short intro\nExtra line";
        let parsed = insight_lines(response, 5).into_inner();
        assert_eq!(
            parsed,
            vec![
                "Clear structure",
                "Good examples",
                "Needs more depth",
                "Add sources",
                "Short intro",
            ]
        );
        assert!(insight_lines("\n  \n", 5).is_fallback());
    }

    #[test]
    fn test_paragraph_summary() {
        let parsed = paragraph_summary("The release improves compile times.\nImportance: 85");
        assert_eq!(
            parsed,
            FieldParse::Parsed(ParagraphSummary {
                summary: "The release improves compile times.".to_string(),
                importance: Some(85),
            })
        );

        let parsed = paragraph_summary("Summary: Short note.").into_inner();
        assert_eq!(parsed.summary, "Short note.");
        assert_eq!(parsed.importance, None);

        let parsed = paragraph_summary("Importance: 300");
        assert!(parsed.is_fallback());
        assert_eq!(parsed.into_inner().importance, Some(100));
    }
}
