//! Normalization of a raw DOM query result into [`ScrapedData`].

use crate::filter::UrlFilter;
use crate::parsers::text;
use crate::renderer::{RawImage, RawMeta, RawPage};
use crate::results::{Headings, Image, Link, Metadata, Paragraph, ScrapedData};
use chrono::{DateTime, Utc};

/// Paragraphs at or below this many characters (after trimming) are dropped
pub const MIN_PARAGRAPH_CHARS: usize = 20;

/// Converts the raw query result for the page at `page_url` into the
/// canonical model.
///
/// Never fails: URLs that cannot be resolved are kept as written.
pub fn normalize(page_url: &str, raw: RawPage, scraped_at: DateTime<Utc>) -> ScrapedData {
    let filter = UrlFilter::new(page_url);

    let mut headings = Headings::default();
    for heading in raw.headings {
        headings.push(heading.level, heading.text.trim().to_string());
    }

    let paragraphs = raw
        .paragraphs
        .iter()
        .map(|p| p.trim())
        .filter(|p| text::char_len(p) > MIN_PARAGRAPH_CHARS)
        .map(Paragraph::new)
        .collect::<Vec<_>>();

    let links = raw
        .anchors
        .iter()
        .filter_map(|anchor| {
            let href = filter.resolve(&anchor.href);
            if !filter.keep_link(&href) {
                return None;
            }
            let is_internal = filter.is_internal(&href);
            Some(Link {
                text: anchor.text.trim().to_string(),
                href,
                is_internal,
                is_external: !is_internal,
            })
        })
        .collect::<Vec<_>>();

    let images = raw
        .images
        .iter()
        .filter_map(|image| normalize_image(&filter, image))
        .collect::<Vec<_>>();

    let metadata = Metadata {
        description: meta_content(&raw.meta, "description"),
        keywords: meta_content(&raw.meta, "keywords"),
        author: meta_content(&raw.meta, "author"),
        og_title: meta_content(&raw.meta, "og:title"),
        og_description: meta_content(&raw.meta, "og:description"),
        og_image: meta_content(&raw.meta, "og:image"),
    };

    ::log::debug!(
        "Normalized {}: {} paragraphs kept of {}, {} links, {} images",
        page_url,
        paragraphs.len(),
        raw.paragraphs.len(),
        links.len(),
        images.len()
    );

    ScrapedData {
        url: page_url.to_string(),
        title: raw.title.trim().to_string(),
        headings,
        paragraphs,
        links,
        images,
        metadata,
        scraped_at,
    }
}

fn normalize_image(filter: &UrlFilter, image: &RawImage) -> Option<Image> {
    // A missing or empty src attribute has no URL to resolve
    let raw_src = image.src.as_deref().map(str::trim).unwrap_or_default();
    if raw_src.is_empty() {
        return None;
    }
    let src = filter.resolve(raw_src);
    if !filter.keep_image(&src) {
        return None;
    }
    Some(Image {
        src,
        alt: image.alt.clone().unwrap_or_default(),
        width: dimension(image.width.as_deref()),
        height: dimension(image.height.as_deref()),
    })
}

/// Positive pixel dimension from an attribute value
fn dimension(value: Option<&str>) -> Option<u32> {
    value
        .and_then(|v| v.trim().trim_end_matches("px").parse::<u32>().ok())
        .filter(|v| *v > 0)
}

/// Content of the first `<meta>` whose `name` or `property` is `key`.
/// Missing and empty content both come back as `None`.
fn meta_content(meta: &[RawMeta], key: &str) -> Option<String> {
    meta.iter()
        .find(|m| m.name.as_deref() == Some(key) || m.property.as_deref() == Some(key))
        .and_then(|m| m.content.as_deref())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string())
}
