use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Default page-load timeout in milliseconds
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Bounds accepted for a per-request timeout
pub const MIN_TIMEOUT_MS: u64 = 1_000;
pub const MAX_TIMEOUT_MS: u64 = 120_000;

/// Configuration for the analyzer and its bundled collaborators
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Page-load timeout used when a request does not set one
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// How long to wait for a request's `wait_for_selector`
    #[serde(default = "default_wait_timeout_ms")]
    pub wait_timeout_ms: u64,

    #[serde(default)]
    pub insights: InsightConfig,

    #[serde(default)]
    pub gemini: GeminiConfig,

    /// How long a cached result stays valid
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Number of results kept retrievable by id
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

/// Limits and caps used by insight synthesis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Paragraphs included in the content digest
    #[serde(default = "default_digest_paragraphs")]
    pub digest_paragraphs: usize,

    /// Digest characters sent with the longer prompts
    #[serde(default = "default_long_budget")]
    pub long_budget: usize,

    /// Digest characters sent with the sentiment and category prompts
    #[serde(default = "default_short_budget")]
    pub short_budget: usize,

    #[serde(default = "default_max_topics")]
    pub max_topics: usize,

    #[serde(default = "default_max_categories")]
    pub max_categories: usize,

    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    /// Cap per entity category
    #[serde(default = "default_max_entities")]
    pub max_entities: usize,

    /// Cap on quality and competitive insight lists
    #[serde(default = "default_max_insights")]
    pub max_insights: usize,

    /// Leading paragraphs eligible for a generated summary
    #[serde(default = "default_summarized_paragraphs")]
    pub summarized_paragraphs: usize,

    /// Paragraphs shorter than this are their own summary
    #[serde(default = "default_min_summary_len")]
    pub min_summary_len: usize,

    /// Paragraph characters sent with a summary prompt
    #[serde(default = "default_paragraph_budget")]
    pub paragraph_budget: usize,

    /// Cutoff for mechanically truncated summaries
    #[serde(default = "default_truncate_at")]
    pub truncate_at: usize,

    /// Per-call timeout; `None` leaves timing to the caller
    #[serde(default)]
    pub call_timeout_ms: Option<u64>,
}

/// Google Generative Language API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiConfig {
    #[serde(default = "default_gemini_api_base")]
    pub api_base: String,

    #[serde(default = "default_gemini_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_gemini_api_key_env")]
    pub api_key_env: String,
}

impl AnalyzerConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, Box<dyn Error>> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Apply overrides from the environment (`WEBDRIVER_URL`)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            timeout_ms: default_timeout_ms(),
            wait_timeout_ms: default_wait_timeout_ms(),
            insights: InsightConfig::default(),
            gemini: GeminiConfig::default(),
            cache_ttl_secs: default_cache_ttl_secs(),
            history_limit: default_history_limit(),
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            digest_paragraphs: default_digest_paragraphs(),
            long_budget: default_long_budget(),
            short_budget: default_short_budget(),
            max_topics: default_max_topics(),
            max_categories: default_max_categories(),
            max_keywords: default_max_keywords(),
            max_entities: default_max_entities(),
            max_insights: default_max_insights(),
            summarized_paragraphs: default_summarized_paragraphs(),
            min_summary_len: default_min_summary_len(),
            paragraph_budget: default_paragraph_budget(),
            truncate_at: default_truncate_at(),
            call_timeout_ms: None,
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_base: default_gemini_api_base(),
            model: default_gemini_model(),
            api_key_env: default_gemini_api_key_env(),
        }
    }
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_wait_timeout_ms() -> u64 {
    10_000
}

fn default_cache_ttl_secs() -> u64 {
    60 * 60
}

fn default_history_limit() -> usize {
    50
}

fn default_digest_paragraphs() -> usize {
    10
}

fn default_long_budget() -> usize {
    3000
}

fn default_short_budget() -> usize {
    2000
}

fn default_max_topics() -> usize {
    7
}

fn default_max_categories() -> usize {
    4
}

fn default_max_keywords() -> usize {
    10
}

fn default_max_entities() -> usize {
    5
}

fn default_max_insights() -> usize {
    5
}

fn default_summarized_paragraphs() -> usize {
    5
}

fn default_min_summary_len() -> usize {
    100
}

fn default_paragraph_budget() -> usize {
    500
}

fn default_truncate_at() -> usize {
    100
}

fn default_gemini_api_base() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_gemini_model() -> String {
    "gemini-2.0-flash-lite".to_string()
}

fn default_gemini_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}
