use crate::renderer::{RawAnchor, RawHeading, RawImage, RawMeta, RawPage};
use crate::results::HeadingLevel;
use scraper::{ElementRef, Html, Selector};

/// Queries a rendered HTML document for everything the extraction step needs.
///
/// Values are kept as raw as the DOM hands them out: text is the element's
/// full text content, attributes are untouched. Trimming, URL resolution and
/// filtering happen in [`crate::extract`].
pub fn parse(html: &str) -> RawPage {
    let doc = Html::parse_document(html);

    let title = select(&doc, "title")
        .next()
        .map(|e| text_content(&e))
        .unwrap_or_default();

    let headings = select(&doc, "h1, h2, h3, h4, h5, h6")
        .filter_map(|e| {
            HeadingLevel::from_tag(e.value().name()).map(|level| RawHeading {
                level,
                text: text_content(&e),
            })
        })
        .collect::<Vec<_>>();

    let paragraphs = select(&doc, "p")
        .map(|e| text_content(&e))
        .collect::<Vec<_>>();

    let anchors = select(&doc, "a[href]")
        .filter_map(|e| {
            e.value().attr("href").map(|href| RawAnchor {
                href: href.to_string(),
                text: text_content(&e),
            })
        })
        .collect::<Vec<_>>();

    let images = select(&doc, "img")
        .map(|e| RawImage {
            src: attr(&e, "src"),
            alt: attr(&e, "alt"),
            width: attr(&e, "width"),
            height: attr(&e, "height"),
        })
        .collect::<Vec<_>>();

    let meta = select(&doc, "meta")
        .map(|e| RawMeta {
            name: attr(&e, "name"),
            property: attr(&e, "property"),
            content: attr(&e, "content"),
        })
        .collect::<Vec<_>>();

    ::log::debug!(
        "HTML parser found {} headings, {} paragraphs, {} links, {} images",
        headings.len(),
        paragraphs.len(),
        anchors.len(),
        images.len()
    );

    RawPage {
        title,
        headings,
        paragraphs,
        anchors,
        images,
        meta,
    }
}

/// Selects matching elements in document order. An invalid selector matches nothing.
fn select<'a>(doc: &'a Html, css: &str) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let selector = Selector::parse(css).ok();
    if selector.is_none() {
        ::log::warn!("Invalid CSS selector: {}", css);
    }
    selector
        .into_iter()
        .flat_map(move |s| doc.select(&s).collect::<Vec<_>>())
}

fn text_content(element: &ElementRef) -> String {
    element.text().collect::<String>()
}

fn attr(element: &ElementRef, name: &str) -> Option<String> {
    element.value().attr(name).map(|v| v.to_string())
}
