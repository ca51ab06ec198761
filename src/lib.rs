// Re-export modules
pub mod analytics;
pub mod assemble;
pub mod config;
pub mod error;
pub mod extract;
pub mod filter;
pub mod insights;
pub mod parsers;
pub mod readability;
pub mod renderer;
pub mod results;
pub mod seo;
pub mod store;

// Re-export commonly used types for convenience
pub use config::AnalyzerConfig;
pub use error::{Error, ErrorReport, Result};
pub use insights::{GeminiClient, TextGenerator};
pub use renderer::{Renderer, WebDriverRenderer};
pub use results::ScrapeResult;
pub use store::{MemoryStore, ResultStore};

use assemble::InsightOutcome;
use chrono::Utc;
use insights::Synthesizer;
use renderer::RenderOptions;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use url::Url;

/// A request to analyze one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,

    #[serde(default)]
    pub options: ScrapeOptions,
}

/// Per-request options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeOptions {
    /// CSS selector to wait for before the DOM is read
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wait_for_selector: Option<String>,

    /// Page-load timeout in milliseconds
    #[serde(
        default,
        rename = "timeout",
        alias = "timeoutMs",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_ms: Option<u64>,

    #[serde(default = "default_true", rename = "includeAIAnalysis")]
    pub include_ai_analysis: bool,

    #[serde(default = "default_true")]
    pub use_cache: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            wait_for_selector: None,
            timeout_ms: None,
            include_ai_analysis: true,
            use_cache: true,
        }
    }
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            options: ScrapeOptions::default(),
        }
    }

    /// Rejects requests that could never succeed
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.url)
            .map_err(|e| Error::Validation(format!("url: Invalid URL format ({})", e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Validation(format!(
                "url: unsupported scheme '{}', expected http or https",
                url.scheme()
            )));
        }
        if url.host_str().is_none_or(str::is_empty) {
            return Err(Error::Validation("url: missing host".to_string()));
        }

        if let Some(timeout) = self.options.timeout_ms {
            if !(config::MIN_TIMEOUT_MS..=config::MAX_TIMEOUT_MS).contains(&timeout) {
                return Err(Error::Validation(format!(
                    "options.timeout: must be between {} and {} ms",
                    config::MIN_TIMEOUT_MS,
                    config::MAX_TIMEOUT_MS
                )));
            }
        }

        if let Some(selector) = &self.options.wait_for_selector {
            if selector.trim().is_empty() {
                return Err(Error::Validation(
                    "options.waitForSelector: must not be empty".to_string(),
                ));
            }
        }

        Ok(())
    }
}

/// Main entry point: renders a page, analyzes it and composes a [`ScrapeResult`]
pub struct Analyzer {
    renderer: Arc<dyn Renderer>,
    generator: Option<Arc<dyn TextGenerator>>,
    store: Option<Arc<dyn ResultStore>>,
    config: AnalyzerConfig,
}

impl Analyzer {
    /// Create a new analyzer that renders pages with `renderer`
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self {
            renderer,
            generator: None,
            store: None,
            config: AnalyzerConfig::default(),
        }
    }

    /// Set the text generator used for AI analysis.
    ///
    /// Without one, AI analysis is skipped even when requested.
    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the store consulted for cached results and fed with fresh ones
    pub fn with_store(mut self, store: Arc<dyn ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_config(mut self, config: AnalyzerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub async fn analyze(&self, request: &ScrapeRequest) -> Result<ScrapeResult> {
        self.analyze_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Like [`Analyzer::analyze`], giving up with [`Error::Cancelled`] once
    /// `cancel` fires. Cancellation is observed before rendering, after
    /// rendering and after AI analysis.
    pub async fn analyze_with_cancel(
        &self,
        request: &ScrapeRequest,
        cancel: &CancellationToken,
    ) -> Result<ScrapeResult> {
        let result = self.run(request, cancel).await;
        if let Err(e) = &result {
            ::log::error!("Analysis of {} failed: {}", request.url, e);
        }
        result
    }

    async fn run(&self, request: &ScrapeRequest, cancel: &CancellationToken) -> Result<ScrapeResult> {
        request.validate()?;
        let url = request.url.as_str();
        let options = &request.options;

        if options.use_cache {
            if let Some(store) = &self.store {
                if let Some(cached) = store.cached(url, options.include_ai_analysis).await {
                    ::log::info!("Cache hit for {}", url);
                    return Ok(cached);
                }
            }
        }

        ensure_active(cancel)?;

        let id = uuid::Uuid::new_v4().to_string();
        ::log::info!("Starting analysis {} of {}", id, url);

        let render_options = RenderOptions {
            wait_for_selector: options.wait_for_selector.clone(),
            timeout: Duration::from_millis(options.timeout_ms.unwrap_or(self.config.timeout_ms)),
        };
        let raw = self.renderer.render(url, &render_options).await?;
        let data = extract::normalize(url, raw, Utc::now());

        ::log::info!(
            "Extracted {}: {} paragraphs, {} links, {} images",
            url,
            data.paragraphs.len(),
            data.links.len(),
            data.images.len()
        );

        ensure_active(cancel)?;

        let outcome = match (&self.generator, options.include_ai_analysis) {
            (Some(generator), true) => {
                let synthesizer = Synthesizer::new(generator.clone(), self.config.insights.clone());
                InsightOutcome::Generated(synthesizer.synthesize(&data).await?)
            }
            (None, true) => {
                ::log::warn!("No text generator configured, skipping AI analysis");
                InsightOutcome::Skipped
            }
            (_, false) => InsightOutcome::Skipped,
        };

        ensure_active(cancel)?;

        let result = assemble::assemble(id, data, outcome);
        ::log::info!(
            "Finished analysis {} of {}: {} words, seo score {}",
            result.id,
            url,
            result.analytics.total_words,
            result.analytics.seo_score
        );

        if let Some(store) = &self.store {
            store.put(url, options.include_ai_analysis, &result).await;
        }

        Ok(result)
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(Error::Cancelled)
    } else {
        Ok(())
    }
}
