//! Point-based SEO score.
//!
//! | Signal | Points |
//! |---|---|
//! | title present / 30-60 chars | 10 / +10 (else +5) |
//! | meta description present / 120-160 chars | 10 / +10 (else +5) |
//! | proper hierarchy / exactly one H1 / any H1 | 15 / 10 / 5 |
//! | any H2 | +5 |
//! | no images / images (+10 at 80% alt, +5 at 50%) | 5 / 5 |
//! | 300 / 150 / 50 words | 15 / 10 / 5 |
//! | og:title and og:description / either | 10 / 5 |
//!
//! The sum is capped at 100. Lengths are counted in characters.

use crate::analytics::ContentAnalysis;
use crate::parsers::text;
use crate::results::{HeadingAnalysis, ImageAnalysis, ScrapedData};

pub const MAX_SCORE: u32 = 100;

const TITLE_OPTIMAL: std::ops::RangeInclusive<usize> = 30..=60;
const DESCRIPTION_OPTIMAL: std::ops::RangeInclusive<usize> = 120..=160;

pub fn score(
    data: &ScrapedData,
    content: &ContentAnalysis,
    images: &ImageAnalysis,
    headings: &HeadingAnalysis,
) -> u8 {
    let total = title_points(&data.title)
        + description_points(data.metadata.description.as_deref())
        + heading_points(headings)
        + image_points(images)
        + content_points(content.total_words)
        + open_graph_points(
            data.metadata.og_title.is_some(),
            data.metadata.og_description.is_some(),
        );

    total.min(MAX_SCORE) as u8
}

fn title_points(title: &str) -> u32 {
    if title.is_empty() {
        return 0;
    }
    if TITLE_OPTIMAL.contains(&text::char_len(title)) {
        20
    } else {
        15
    }
}

fn description_points(description: Option<&str>) -> u32 {
    match description {
        Some(d) if !d.is_empty() => {
            if DESCRIPTION_OPTIMAL.contains(&text::char_len(d)) {
                20
            } else {
                15
            }
        }
        _ => 0,
    }
}

fn heading_points(headings: &HeadingAnalysis) -> u32 {
    let structure = if headings.has_proper_hierarchy {
        15
    } else if headings.h1_count == 1 {
        10
    } else if headings.h1_count > 0 {
        5
    } else {
        0
    };
    let sections = if headings.h2_count > 0 { 5 } else { 0 };
    structure + sections
}

fn image_points(images: &ImageAnalysis) -> u32 {
    // A page without images is not penalized
    if images.total_images == 0 {
        return 5;
    }
    let alt = if images.alt_text_coverage >= 80 {
        10
    } else if images.alt_text_coverage >= 50 {
        5
    } else {
        0
    };
    5 + alt
}

fn content_points(total_words: usize) -> u32 {
    match total_words {
        w if w >= 300 => 15,
        w if w >= 150 => 10,
        w if w >= 50 => 5,
        _ => 0,
    }
}

fn open_graph_points(has_title: bool, has_description: bool) -> u32 {
    match (has_title, has_description) {
        (true, true) => 10,
        (true, false) | (false, true) => 5,
        (false, false) => 0,
    }
}
