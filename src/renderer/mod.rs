//! The page-rendering boundary.
//!
//! A [`Renderer`] loads one URL in a browser and hands back the primitive
//! result of querying its DOM. Browser lifecycle, retries and load strategy
//! live behind the trait; the rest of the crate only sees [`RawPage`].

pub mod web;

use crate::error::ExtractionFailure;
use crate::results::HeadingLevel;
use async_trait::async_trait;
use std::time::Duration;

pub use web::WebDriverRenderer;

/// Per-request rendering options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// CSS selector that must be present before the DOM is queried
    pub wait_for_selector: Option<String>,

    /// Upper bound on page load
    pub timeout: Duration,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            wait_for_selector: None,
            timeout: Duration::from_millis(crate::config::DEFAULT_TIMEOUT_MS),
        }
    }
}

/// Renders a URL and returns the queried DOM
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(
        &self,
        url: &str,
        options: &RenderOptions,
    ) -> Result<RawPage, ExtractionFailure>;
}

/// Raw DOM query result for one page.
///
/// Text is raw `textContent`; attribute values are exactly what the markup holds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPage {
    pub title: String,
    /// Every `h1`..`h6` element in document order
    pub headings: Vec<RawHeading>,
    /// Text of every `<p>` element
    pub paragraphs: Vec<String>,
    /// Every `<a>` that carries an `href` attribute
    pub anchors: Vec<RawAnchor>,
    pub images: Vec<RawImage>,
    pub meta: Vec<RawMeta>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawHeading {
    pub level: HeadingLevel,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawAnchor {
    pub href: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawImage {
    pub src: Option<String>,
    pub alt: Option<String>,
    pub width: Option<String>,
    pub height: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMeta {
    pub name: Option<String>,
    pub property: Option<String>,
    pub content: Option<String>,
}
