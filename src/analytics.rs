//! Structural analytics over a normalized page. Everything here is pure and total.

use crate::parsers::text;
use crate::results::{
    AnalyticsData, HeadingAnalysis, Headings, Image, ImageAnalysis, Link, LinkAnalysis,
    ScrapedData,
};
use crate::seo;

/// Reading speed used for `reading_time`, in words per minute
pub const WORDS_PER_MINUTE: usize = 225;

/// Word count and reading time of the page's paragraphs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentAnalysis {
    pub total_words: usize,
    /// Minutes, rounded up
    pub reading_time: usize,
}

/// Computes every analytic for `data`, including the SEO score
pub fn generate(data: &ScrapedData) -> AnalyticsData {
    let content = content_analysis(data);
    let link_analysis = link_analysis(&data.links);
    let image_analysis = image_analysis(&data.images);
    let heading_analysis = heading_analysis(&data.headings);
    let seo_score = seo::score(data, &content, &image_analysis, &heading_analysis);

    ::log::debug!(
        "Analytics for {}: {} words, {} links, {} images, seo score {}",
        data.url,
        content.total_words,
        link_analysis.total_links,
        image_analysis.total_images,
        seo_score
    );

    AnalyticsData {
        total_words: content.total_words,
        reading_time: content.reading_time,
        link_analysis,
        image_analysis,
        heading_analysis,
        seo_score,
    }
}

/// Canonical word count: whitespace-separated tokens across all paragraphs
pub fn content_analysis(data: &ScrapedData) -> ContentAnalysis {
    let total_words = text::count_words_in(data.paragraphs.iter().map(|p| p.text.as_str()));
    ContentAnalysis {
        total_words,
        reading_time: total_words.div_ceil(WORDS_PER_MINUTE),
    }
}

pub fn link_analysis(links: &[Link]) -> LinkAnalysis {
    LinkAnalysis {
        total_links: links.len(),
        internal_links: links.iter().filter(|l| l.is_internal).count(),
        external_links: links.iter().filter(|l| l.is_external).count(),
        broken_links: links.iter().filter(|l| is_suspicious(l)).count(),
    }
}

/// Heuristic only: no request is ever made to check a link
fn is_suspicious(link: &Link) -> bool {
    link.text.is_empty()
        || link.href.contains("undefined")
        || link.href.contains("null")
        || link.href == "#"
}

pub fn image_analysis(images: &[Image]) -> ImageAnalysis {
    let total_images = images.len();
    let images_with_alt = images.iter().filter(|i| !i.alt.trim().is_empty()).count();
    let alt_text_coverage = if total_images > 0 {
        ((images_with_alt as f64 / total_images as f64) * 100.0).round() as u8
    } else {
        0
    };

    ImageAnalysis {
        total_images,
        images_with_alt,
        images_without_alt: total_images - images_with_alt,
        alt_text_coverage,
    }
}

pub fn heading_analysis(headings: &Headings) -> HeadingAnalysis {
    let h1_count = headings.h1.len();
    let h2_count = headings.h2.len();
    let total_headings = headings.total();

    HeadingAnalysis {
        total_headings,
        h1_count,
        h2_count,
        h3_count: headings.h3.len(),
        h4_count: headings.h4.len(),
        h5_count: headings.h5.len(),
        h6_count: headings.h6.len(),
        // A lone H1 with nothing else still counts as proper
        has_proper_hierarchy: h1_count == 1 && (h2_count > 0 || total_headings == 1),
    }
}
