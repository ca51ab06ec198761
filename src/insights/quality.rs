//! SEO verdicts and content-quality score computed locally from page structure.

use crate::parsers::text;
use crate::results::{ScrapedData, SeoInsights};

const GOOD: &str = "Good";

pub fn seo_insights(data: &ScrapedData) -> SeoInsights {
    let title_len = text::char_len(&data.title);
    let title_quality = if title_len < 30 {
        "Too short - should be 30-60 characters"
    } else if title_len > 60 {
        "Too long - should be 30-60 characters"
    } else {
        GOOD
    };

    let description = data.metadata.description.as_deref().filter(|d| !d.is_empty());
    let meta_description_quality = match description.map(text::char_len) {
        None => "Missing - add a meta description",
        Some(len) if len < 120 => "Too short - should be 120-160 characters",
        Some(len) if len > 160 => "Too long - should be 120-160 characters",
        Some(_) => GOOD,
    };

    let h1_count = data.headings.h1.len();
    let heading_structure = match h1_count {
        0 => "Missing H1 tag - add one H1 per page",
        1 => GOOD,
        _ => "Multiple H1 tags - use only one H1 per page",
    };

    let word_count = text::count_words_in(data.paragraphs.iter().map(|p| p.text.as_str()));
    let keyword_density = if word_count > 0 {
        format!("Approximately {} words analyzed", word_count)
    } else {
        "No content to analyze".to_string()
    };

    let mut recommendations = Vec::new();
    if !(30..=60).contains(&title_len) {
        recommendations.push("Optimize title length to 30-60 characters");
    }
    if description.is_none() {
        recommendations.push("Add a meta description (120-160 characters)");
    }
    if h1_count != 1 {
        recommendations.push("Use exactly one H1 tag per page");
    }
    if data.headings.h2.is_empty() {
        recommendations.push("Add H2 headings to structure your content");
    }
    if data.metadata.og_title.is_none() || data.metadata.og_description.is_none() {
        recommendations.push("Add Open Graph meta tags for social sharing");
    }
    if data.paragraphs.len() < 3 {
        recommendations.push("Add more content - aim for at least 300 words");
    }

    SeoInsights {
        title_quality: title_quality.to_string(),
        meta_description_quality: meta_description_quality.to_string(),
        heading_structure: heading_structure.to_string(),
        keyword_density,
        recommendations: recommendations.into_iter().map(str::to_string).collect(),
    }
}

/// Structural completeness of the page in [0, 100]
pub fn content_quality_score(data: &ScrapedData) -> u8 {
    let words = text::count_words_in(data.paragraphs.iter().map(|p| p.text.as_str()));
    let word_points = match words {
        w if w >= 300 => 30,
        w if w >= 150 => 20,
        w if w >= 50 => 10,
        _ => 0,
    };

    let heading_points = match data.headings.total() {
        h if h >= 3 => 20,
        h if h >= 1 => 10,
        _ => 0,
    };

    let paragraph_points = match data.paragraphs.len() {
        p if p >= 3 => 20,
        p if p >= 1 => 10,
        _ => 0,
    };

    let image_points = if data.images.is_empty() { 0 } else { 15 };
    let link_points = if data.links.is_empty() { 0 } else { 15 };

    let total: u32 = word_points + heading_points + paragraph_points + image_points + link_points;
    total.min(100) as u8
}
