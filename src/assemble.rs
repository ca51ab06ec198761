//! Composition of the final [`ScrapeResult`].

use crate::analytics;
use crate::insights::Synthesis;
use crate::results::{AiAnalysis, ScrapeResult, ScrapedData, SeoInsights};

const SKIPPED_SUMMARY: &str = "AI analysis skipped";
const NOT_ANALYZED: &str = "Not analyzed";

/// What insight synthesis produced for a page
#[derive(Debug, Clone, PartialEq)]
pub enum InsightOutcome {
    /// The caller opted out of AI analysis
    Skipped,
    Generated(Synthesis),
}

/// Computes analytics for `data` and composes the result.
///
/// A generated outcome also replaces the page's paragraphs with their
/// summarized versions. Analytics only read paragraph text, so they are the
/// same either way.
pub fn assemble(id: impl Into<String>, mut data: ScrapedData, outcome: InsightOutcome) -> ScrapeResult {
    let analytics = analytics::generate(&data);

    let ai_analysis = match outcome {
        InsightOutcome::Skipped => skipped_analysis(),
        InsightOutcome::Generated(synthesis) => {
            data.paragraphs = synthesis.paragraphs;
            synthesis.analysis
        }
    };

    ScrapeResult {
        id: id.into(),
        data,
        ai_analysis,
        analytics,
    }
}

/// Placeholder used when AI analysis was not requested
pub fn skipped_analysis() -> AiAnalysis {
    AiAnalysis {
        content_summary: SKIPPED_SUMMARY.to_string(),
        key_topics: Vec::new(),
        seo_insights: SeoInsights {
            title_quality: NOT_ANALYZED.to_string(),
            meta_description_quality: NOT_ANALYZED.to_string(),
            heading_structure: NOT_ANALYZED.to_string(),
            keyword_density: NOT_ANALYZED.to_string(),
            recommendations: Vec::new(),
        },
        content_categories: Vec::new(),
        ..AiAnalysis::default()
    }
}
