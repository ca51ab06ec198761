use clap::Parser;
use page_insight::{AnalyzerConfig, ScrapeRequest};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-insight")]
#[command(about = "Renders a web page and reports its structure, SEO score and AI insights")]
#[command(version)]
pub struct Args {
    /// Page URL to analyze (http or https)
    pub url: String,

    /// CSS selector to wait for before reading the page
    #[arg(long)]
    pub wait_for_selector: Option<String>,

    /// Page-load timeout in milliseconds (1000-120000)
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Skip AI analysis
    #[arg(long)]
    pub no_ai: bool,

    /// Ignore cached results
    #[arg(long)]
    pub no_cache: bool,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (overrides config and WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Args {
    /// Builds the request described by the command line
    pub fn request(&self) -> ScrapeRequest {
        let mut request = ScrapeRequest::new(self.url.clone());
        request.options.wait_for_selector = self.wait_for_selector.clone();
        request.options.timeout_ms = self.timeout;
        request.options.include_ai_analysis = !self.no_ai;
        request.options.use_cache = !self.no_cache;
        request
    }

    /// Loads the configuration file if given, then applies environment and
    /// command-line overrides
    pub fn config(&self) -> Result<AnalyzerConfig, Box<dyn std::error::Error>> {
        let config = match &self.config {
            Some(path) => AnalyzerConfig::from_file(path)?,
            None => AnalyzerConfig::default(),
        };
        let mut config = config.with_env_overrides();
        if let Some(webdriver_url) = &self.webdriver_url {
            config.webdriver_url = webdriver_url.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_to_request() {
        let args = Args::parse_from([
            "page-insight",
            "https://example.com",
            "--wait-for-selector",
            "main",
            "--timeout",
            "5000",
            "--no-ai",
        ]);
        let request = args.request();

        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.options.wait_for_selector.as_deref(), Some("main"));
        assert_eq!(request.options.timeout_ms, Some(5000));
        assert!(!request.options.include_ai_analysis);
        assert!(request.options.use_cache);
    }

    #[test]
    fn test_webdriver_url_flag_overrides_config() {
        let args = Args::parse_from([
            "page-insight",
            "https://example.com",
            "--webdriver-url",
            "http://localhost:9515",
        ]);
        assert_eq!(args.config().unwrap().webdriver_url, "http://localhost:9515");
    }
}
