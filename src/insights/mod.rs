//! Insight synthesis: qualitative fields filled in by a text-generation
//! service, plus the locally computed scores that ride along with them.
//!
//! All prompts for a page are issued concurrently. Only the summary is
//! mandatory; every other field degrades to an empty or neutral value when
//! its call fails or its response cannot be parsed.

pub mod digest;
pub mod generator;
pub mod parse;
pub mod prompts;
pub mod quality;

use crate::config::InsightConfig;
use crate::error::{Error, GenerationError, Result};
use crate::parsers::text;
use crate::readability;
use crate::results::{AiAnalysis, Entities, Paragraph, ScrapedData, Sentiment};
use digest::Digest;
use parse::FieldParse;
use std::sync::Arc;
use std::time::Duration;

pub use generator::{GeminiClient, TextGenerator};

/// Output of a synthesis run
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub analysis: AiAnalysis,
    /// The page's paragraphs, each with a summary and an importance
    pub paragraphs: Vec<Paragraph>,
}

/// Runs the prompts for one page against a [`TextGenerator`]
#[derive(Clone)]
pub struct Synthesizer {
    generator: Arc<dyn TextGenerator>,
    config: InsightConfig,
}

impl Synthesizer {
    pub fn new(generator: Arc<dyn TextGenerator>, config: InsightConfig) -> Self {
        Self { generator, config }
    }

    pub async fn synthesize(&self, data: &ScrapedData) -> Result<Synthesis> {
        let digest = Digest::prepare(data, self.config.digest_paragraphs)?;
        let long = digest.truncated(self.config.long_budget);
        let short = digest.truncated(self.config.short_budget);
        let cfg = &self.config;

        ::log::debug!(
            "Synthesizing insights for {} ({} digest chars)",
            data.url,
            text::char_len(digest.as_str())
        );

        let (
            summary,
            topics,
            sentiment,
            entities,
            keywords,
            quality,
            competitive,
            categories,
            paragraphs,
        ) = tokio::join!(
            self.call("summary", prompts::summary(long)),
            self.call("key topics", prompts::key_topics(long)),
            self.call("sentiment", prompts::sentiment(short)),
            self.call("entities", prompts::entities(long)),
            self.call("keywords", prompts::keywords(long, cfg.max_keywords)),
            self.call("content quality", prompts::content_quality(long)),
            self.call("competitive insights", prompts::competitive(long)),
            self.call("categories", prompts::categories(short)),
            self.summarize_paragraphs(&data.paragraphs),
        );

        let content_summary = summary
            .map_err(|e| Error::Analysis(format!("summary generation failed: {}", e)))?
            .trim()
            .to_string();
        if content_summary.is_empty() {
            return Err(Error::Analysis("summary generation returned no text".to_string()));
        }

        let key_topics = field("key topics", topics, Vec::new(), |r| {
            parse::comma_list(r, cfg.max_topics)
        });
        let content_categories = field("categories", categories, Vec::new(), |r| {
            parse::comma_list(r, cfg.max_categories)
        });
        let (sentiment, sentiment_confidence) = match sentiment {
            Ok(response) => {
                let reading = parse::sentiment(&response);
                if reading.is_fallback() {
                    ::log::warn!("Unrecognized sentiment response, using neutral");
                }
                let reading = reading.into_inner();
                (reading.sentiment, Some(reading.confidence))
            }
            Err(e) => {
                ::log::warn!("sentiment generation failed, using neutral: {}", e);
                (Sentiment::Neutral, None)
            }
        };
        let entities = field("entities", entities, Entities::default(), |r| {
            parse::entities(r, cfg.max_entities)
        });
        let keywords = field("keywords", keywords, Vec::new(), |r| {
            parse::keywords(r, cfg.max_keywords)
        });
        let quality_insights = field("content quality", quality, Vec::new(), |r| {
            parse::insight_lines(r, cfg.max_insights)
        });
        let competitive_insights = field("competitive insights", competitive, Vec::new(), |r| {
            parse::insight_lines(r, cfg.max_insights)
        });

        let analysis = AiAnalysis {
            content_summary,
            key_topics,
            sentiment: Some(sentiment),
            sentiment_confidence,
            readability_score: Some(readability::score(digest.as_str())),
            seo_insights: quality::seo_insights(data),
            content_categories,
            entities: Some(entities),
            keywords: Some(keywords),
            content_quality_score: Some(quality::content_quality_score(data)),
            content_quality_insights: Some(quality_insights),
            competitive_insights: Some(competitive_insights),
        };

        Ok(Synthesis {
            analysis,
            paragraphs,
        })
    }

    /// One generation call, bounded by the configured per-call timeout
    async fn call(&self, name: &str, prompt: String) -> std::result::Result<String, GenerationError> {
        ::log::trace!("Requesting {} ({} prompt chars)", name, prompt.len());
        match self.config.call_timeout_ms {
            Some(ms) => tokio::time::timeout(
                Duration::from_millis(ms),
                self.generator.generate(&prompt),
            )
            .await
            .unwrap_or(Err(GenerationError::Timeout(ms))),
            None => self.generator.generate(&prompt).await,
        }
    }

    async fn summarize_paragraphs(&self, paragraphs: &[Paragraph]) -> Vec<Paragraph> {
        let cfg = &self.config;
        let head = paragraphs.len().min(cfg.summarized_paragraphs);

        let summarized = futures::future::join_all(
            paragraphs[..head]
                .iter()
                .enumerate()
                .map(|(index, paragraph)| self.summarize_paragraph(index, paragraph)),
        )
        .await;

        let rest = paragraphs[head..]
            .iter()
            .enumerate()
            .map(|(offset, paragraph)| Paragraph {
                text: paragraph.text.clone(),
                summary: Some(text::ellipsize(&paragraph.text, cfg.truncate_at)),
                importance: Some(synthetic_importance(head + offset)),
            });

        summarized.into_iter().chain(rest).collect()
    }

    async fn summarize_paragraph(&self, index: usize, paragraph: &Paragraph) -> Paragraph {
        let cfg = &self.config;
        let fallback_importance = synthetic_importance(index);

        if text::char_len(&paragraph.text) < cfg.min_summary_len {
            return Paragraph {
                text: paragraph.text.clone(),
                summary: Some(paragraph.text.clone()),
                importance: Some(fallback_importance),
            };
        }

        let prompt = prompts::paragraph(text::truncate_chars(&paragraph.text, cfg.paragraph_budget));
        let parsed = match self.call("paragraph summary", prompt).await {
            Ok(response) => match parse::paragraph_summary(&response) {
                FieldParse::Parsed(parsed) => Some(parsed),
                FieldParse::Fallback(_) => {
                    ::log::warn!("Empty summary for paragraph {}, truncating instead", index);
                    None
                }
            },
            Err(e) => {
                ::log::warn!("Summary of paragraph {} failed, truncating instead: {}", index, e);
                None
            }
        };

        match parsed {
            Some(parsed) => Paragraph {
                text: paragraph.text.clone(),
                summary: Some(parsed.summary),
                importance: Some(parsed.importance.unwrap_or(fallback_importance)),
            },
            None => Paragraph {
                text: paragraph.text.clone(),
                summary: Some(text::ellipsize(&paragraph.text, cfg.truncate_at)),
                importance: Some(fallback_importance),
            },
        }
    }
}

/// Position-based importance: 100 for the first paragraph and one less for
/// each one after it, bottoming out at 0 from the 101st paragraph on
pub fn synthetic_importance(index: usize) -> u8 {
    100usize.saturating_sub(index) as u8
}

/// Resolves an optional field from its call outcome, logging degradations
fn field<T>(
    name: &str,
    response: std::result::Result<String, GenerationError>,
    default: T,
    parse: impl FnOnce(&str) -> FieldParse<T>,
) -> T {
    match response {
        Ok(response) => {
            let parsed = parse(&response);
            if parsed.is_fallback() {
                ::log::warn!("Could not parse {} response, using default", name);
            }
            parsed.into_inner()
        }
        Err(e) => {
            ::log::warn!("{} generation failed, using default: {}", name, e);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Headings, Keyword};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    /// Answers by matching the start of the prompt
    struct ScriptedGenerator {
        fail_on: Vec<&'static str>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new() -> Self {
            Self::failing_on(&[])
        }

        fn failing_on(markers: &[&'static str]) -> Self {
            Self {
                fail_on: markers.to_vec(),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompt_count(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if self.fail_on.iter().any(|m| prompt.starts_with(m)) {
                return Err(GenerationError::Request("scripted failure".to_string()));
            }
            let answer = if prompt.starts_with("Analyze the following web page") {
                "A page about Rust releases."
            } else if prompt.starts_with("Extract 5-7 key topics") {
                "Rust, releases, compilers"
            } else if prompt.starts_with("Analyze the overall sentiment") {
                "positive\nConfidence: 88"
            } else if prompt.starts_with("Extract the named entities") {
                "People: Alice\nOrganizations: Rust Foundation\nLocations: none\nTechnologies: Rust, Cargo"
            } else if prompt.starts_with("List up to") {
                "rust: 90\ncargo: 70"
            } else if prompt.starts_with("Assess the quality") {
                "- Clear\n- Concise"
            } else if prompt.starts_with("Suggest 3-5") {
                "1. Add benchmarks"
            } else if prompt.starts_with("Categorize") {
                "Technology, News"
            } else if prompt.starts_with("Summarize the following paragraph") {
                "A long paragraph, summarized.\nImportance: 77"
            } else {
                "unexpected prompt"
            };
            Ok(answer.to_string())
        }
    }

    struct SlowGenerator;

    #[async_trait]
    impl TextGenerator for SlowGenerator {
        async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError> {
            if prompt.starts_with("Analyze the following web page") {
                return Ok("Quick summary.".to_string());
            }
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("positive".to_string())
        }
    }

    fn page(paragraphs: Vec<String>) -> ScrapedData {
        ScrapedData {
            url: "https://example.com/".to_string(),
            title: "Rust 2.0 released with many new features".to_string(),
            headings: Headings {
                h1: vec!["Rust 2.0".to_string()],
                ..Headings::default()
            },
            paragraphs: paragraphs.into_iter().map(Paragraph::new).collect(),
            links: Vec::new(),
            images: Vec::new(),
            metadata: Default::default(),
            scraped_at: Utc::now(),
        }
    }

    fn long_paragraph(tag: usize) -> String {
        format!("Paragraph {} {}", tag, "is long enough to need a summary. ".repeat(5))
    }

    #[tokio::test]
    async fn test_full_synthesis() {
        let generator = Arc::new(ScriptedGenerator::new());
        let synthesizer = Synthesizer::new(generator.clone(), InsightConfig::default());
        let data = page(vec![
            long_paragraph(0),
            "A short paragraph under the summary limit.".to_string(),
        ]);

        let synthesis = synthesizer.synthesize(&data).await.unwrap();
        let analysis = synthesis.analysis;

        assert_eq!(analysis.content_summary, "A page about Rust releases.");
        assert_eq!(analysis.key_topics, vec!["Rust", "releases", "compilers"]);
        assert_eq!(analysis.sentiment, Some(Sentiment::Positive));
        assert_eq!(analysis.sentiment_confidence, Some(88));
        assert_eq!(analysis.content_categories, vec!["Technology", "News"]);
        let entities = analysis.entities.unwrap();
        assert_eq!(entities.organizations, vec!["Rust Foundation"]);
        assert!(entities.locations.is_empty());
        assert_eq!(
            analysis.keywords.unwrap()[0],
            Keyword {
                keyword: "rust".to_string(),
                relevance: 90
            }
        );
        assert_eq!(analysis.content_quality_insights.unwrap(), vec!["Clear", "Concise"]);
        assert_eq!(analysis.competitive_insights.unwrap(), vec!["Add benchmarks"]);
        assert!(analysis.readability_score.is_some());
        assert!(analysis.content_quality_score.is_some());

        assert_eq!(synthesis.paragraphs.len(), 2);
        assert_eq!(
            synthesis.paragraphs[0].summary.as_deref(),
            Some("A long paragraph, summarized.")
        );
        assert_eq!(synthesis.paragraphs[0].importance, Some(77));
        // Short paragraphs summarize themselves without a call
        assert_eq!(
            synthesis.paragraphs[1].summary.as_deref(),
            Some("A short paragraph under the summary limit.")
        );
        assert_eq!(synthesis.paragraphs[1].importance, Some(99));

        // 8 page-level prompts and one paragraph prompt
        assert_eq!(generator.prompt_count(), 9);
    }

    #[tokio::test]
    async fn test_optional_failures_degrade() {
        let generator = Arc::new(ScriptedGenerator::failing_on(&[
            "Extract",
            "Analyze the overall sentiment",
            "List up to",
            "Assess",
            "Suggest",
            "Categorize",
            "Summarize",
        ]));
        let synthesizer = Synthesizer::new(generator, InsightConfig::default());
        let data = page(vec![long_paragraph(0)]);

        let synthesis = synthesizer.synthesize(&data).await.unwrap();
        let analysis = synthesis.analysis;

        assert_eq!(analysis.content_summary, "A page about Rust releases.");
        assert!(analysis.key_topics.is_empty());
        assert!(analysis.content_categories.is_empty());
        assert_eq!(analysis.sentiment, Some(Sentiment::Neutral));
        assert_eq!(analysis.sentiment_confidence, None);
        assert_eq!(analysis.entities, Some(Entities::default()));
        assert_eq!(analysis.keywords, Some(vec![]));
        assert_eq!(analysis.content_quality_insights, Some(vec![]));
        assert_eq!(analysis.competitive_insights, Some(vec![]));

        let paragraph = &synthesis.paragraphs[0];
        let summary = paragraph.summary.as_deref().unwrap();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 103);
        assert_eq!(paragraph.importance, Some(100));
    }

    #[tokio::test]
    async fn test_summary_failure_is_fatal() {
        let generator = Arc::new(ScriptedGenerator::failing_on(&["Analyze the following web page"]));
        let synthesizer = Synthesizer::new(generator, InsightConfig::default());

        let err = synthesizer.synthesize(&page(vec![])).await.unwrap_err();
        assert!(matches!(err, Error::Analysis(_)));
    }

    #[tokio::test]
    async fn test_empty_page_is_fatal() {
        let generator = Arc::new(ScriptedGenerator::new());
        let synthesizer = Synthesizer::new(generator.clone(), InsightConfig::default());
        let mut data = page(vec![]);
        data.title.clear();
        data.headings = Headings::default();

        let err = synthesizer.synthesize(&data).await.unwrap_err();
        assert!(matches!(err, Error::Analysis(_)));
        assert_eq!(generator.prompt_count(), 0);
    }

    #[tokio::test]
    async fn test_paragraphs_beyond_limit_are_truncated() {
        let generator = Arc::new(ScriptedGenerator::new());
        let synthesizer = Synthesizer::new(generator.clone(), InsightConfig::default());
        let data = page((0..8).map(long_paragraph).collect());

        let synthesis = synthesizer.synthesize(&data).await.unwrap();
        assert_eq!(synthesis.paragraphs.len(), 8);
        assert_eq!(generator.prompt_count(), 8 + 5);

        for (index, paragraph) in synthesis.paragraphs.iter().enumerate().skip(5) {
            let head = data.paragraphs[index].text.chars().take(100).collect::<String>();
            let expected = format!("{}...", head);
            assert_eq!(paragraph.summary.as_deref(), Some(expected.as_str()));
            assert_eq!(paragraph.importance, Some(synthetic_importance(index)));
        }
    }

    #[tokio::test]
    async fn test_call_timeout_degrades_field() {
        let config = InsightConfig {
            call_timeout_ms: Some(50),
            ..InsightConfig::default()
        };
        let synthesizer = Synthesizer::new(Arc::new(SlowGenerator), config);

        let synthesis = synthesizer.synthesize(&page(vec![])).await.unwrap();
        assert_eq!(synthesis.analysis.content_summary, "Quick summary.");
        assert_eq!(synthesis.analysis.sentiment, Some(Sentiment::Neutral));
        assert_eq!(synthesis.analysis.sentiment_confidence, None);
        assert!(synthesis.analysis.key_topics.is_empty());
    }

    #[test]
    fn test_synthetic_importance() {
        assert_eq!(synthetic_importance(0), 100);
        assert_eq!(synthetic_importance(3), 97);
        assert_eq!(synthetic_importance(100), 0);
        assert_eq!(synthetic_importance(5000), 0);
        for i in 0..100 {
            assert!(synthetic_importance(i) > synthetic_importance(i + 1));
        }
    }
}
