use crate::config::AnalyzerConfig;
use crate::error::ExtractionFailure;
use crate::parsers;
use crate::renderer::{RawPage, RenderOptions, Renderer};
use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::{Map, Value, json};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::timeout;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Renders pages through a WebDriver server (ChromeDriver, geckodriver, ...).
///
/// One WebDriver session is opened lazily on first use and reused for every
/// render; renders are serialized on it. A session that the driver has lost is
/// replaced once per render before the failure is reported.
pub struct WebDriverRenderer {
    webdriver_url: String,
    headless: bool,
    wait_timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl WebDriverRenderer {
    /// Create a renderer for the WebDriver server named in `config`
    pub fn new(config: &AnalyzerConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            headless: config.headless,
            wait_timeout: Duration::from_millis(config.wait_timeout_ms),
            client: Mutex::new(None),
        }
    }

    /// Ends the WebDriver session, if one is open
    pub async fn close(&self) {
        if let Some(client) = self.client.lock().await.take() {
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            } else {
                ::log::debug!("Closed WebDriver session");
            }
        }
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn render(
        &self,
        url: &str,
        options: &RenderOptions,
    ) -> Result<RawPage, ExtractionFailure> {
        let started = Instant::now();
        let mut session = self.client.lock().await;

        for attempt in 0..2 {
            let client = match session.as_ref() {
                Some(client) => client.clone(),
                None => {
                    let client = connect_to_webdriver(&self.webdriver_url, self.headless).await?;
                    *session = Some(client.clone());
                    client
                }
            };

            match load_page(&client, url, options, self.wait_timeout).await {
                Ok(html) => {
                    let page = parsers::html::parse(&html);
                    ::log::debug!(
                        "Rendered {} in {:.2} seconds",
                        url,
                        started.elapsed().as_secs_f64()
                    );
                    return Ok(page);
                }
                Err(LoadError::Command(e)) if attempt == 0 && is_session_lost(&e) => {
                    ::log::warn!("Lost WebDriver session while loading {}, reconnecting", url);
                    *session = None;
                }
                Err(e) => {
                    let failure = e.into_failure();
                    ::log::error!("Failed to render {}: {}", url, failure);
                    return Err(failure);
                }
            }
        }

        Err(ExtractionFailure::Unexpected(
            "WebDriver session could not be re-established".to_string(),
        ))
    }
}

enum LoadError {
    Timeout,
    Command(CmdError),
}

impl LoadError {
    fn into_failure(self) -> ExtractionFailure {
        match self {
            LoadError::Timeout => ExtractionFailure::Timeout,
            LoadError::Command(e) => classify_command_error(&e),
        }
    }
}

/// Navigates, waits for the optional selector and returns the rendered source
async fn load_page(
    client: &Client,
    url: &str,
    options: &RenderOptions,
    wait_timeout: Duration,
) -> Result<String, LoadError> {
    let navigation = timeout(options.timeout, async {
        client.goto(url).await?;

        if let Some(selector) = options.wait_for_selector.as_deref() {
            ::log::debug!("Waiting for selector {:?} on {}", selector, url);
            client
                .wait()
                .at_most(wait_timeout)
                .for_element(Locator::Css(selector))
                .await?;
        }

        client.source().await
    })
    .await;

    match navigation {
        Ok(Ok(html)) => Ok(html),
        Ok(Err(e)) => Err(LoadError::Command(e)),
        Err(_) => Err(LoadError::Timeout),
    }
}

/// Connects to the WebDriver instance, trying common local ports if the
/// configured one does not answer
async fn connect_to_webdriver(
    webdriver_url: &str,
    headless: bool,
) -> Result<Client, ExtractionFailure> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(headless));

    match builder.connect(webdriver_url).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
        }
    }

    let fallback_urls = [
        "http://localhost:9515", // ChromeDriver default
        "http://localhost:4444", // Selenium / geckodriver default
        "http://127.0.0.1:4444",
    ];

    for url in fallback_urls.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        if let Ok(client) = builder.connect(url).await {
            ::log::debug!("Connected to fallback WebDriver at {}", url);
            return Ok(client);
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(ExtractionFailure::Unexpected(format!(
        "no WebDriver server reachable at {}",
        webdriver_url
    )))
}

/// Browser capabilities for Chrome and Firefox drivers alike
fn capabilities(headless: bool) -> Map<String, Value> {
    let mut chrome_args = vec![
        "--no-sandbox".to_string(),
        "--disable-setuid-sandbox".to_string(),
        format!("--user-agent={}", USER_AGENT),
    ];
    let mut firefox_args: Vec<String> = Vec::new();
    if headless {
        chrome_args.push("--headless=new".to_string());
        firefox_args.push("-headless".to_string());
    }

    let mut caps = Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    caps.insert("moz:firefoxOptions".to_string(), json!({ "args": firefox_args }));
    caps
}

fn is_session_lost(error: &CmdError) -> bool {
    let message = error.to_string();
    message.contains("Unable to find session") || message.contains("invalid session id")
}

/// Maps a WebDriver command error onto the extraction failure kinds
fn classify_command_error(error: &CmdError) -> ExtractionFailure {
    if matches!(error, CmdError::WaitTimeout) {
        return ExtractionFailure::Timeout;
    }

    let message = error.to_string();
    classify_message(&message)
}

fn classify_message(message: &str) -> ExtractionFailure {
    let lowered = message.to_ascii_lowercase();
    if lowered.contains("net::err")
        || lowered.contains("dnsnotfound")
        || lowered.contains("connectionfailure")
        || lowered.contains("name_not_resolved")
    {
        ExtractionFailure::Unreachable(message.to_string())
    } else if lowered.contains("timeout") || lowered.contains("timed out") {
        ExtractionFailure::Timeout
    } else {
        ExtractionFailure::Unexpected(message.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_message() {
        assert_eq!(
            classify_message("unknown error: net::ERR_NAME_NOT_RESOLVED"),
            ExtractionFailure::Unreachable("unknown error: net::ERR_NAME_NOT_RESOLVED".to_string())
        );
        assert!(matches!(
            classify_message("Reached error page: about:neterror?e=dnsNotFound"),
            ExtractionFailure::Unreachable(_)
        ));
        assert_eq!(
            classify_message("timeout: Timed out receiving message from renderer"),
            ExtractionFailure::Timeout
        );
        assert!(matches!(
            classify_message("javascript error: boom"),
            ExtractionFailure::Unexpected(_)
        ));
    }

    #[test]
    fn test_capabilities_headless() {
        let caps = capabilities(true);
        let chrome_args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(chrome_args.iter().any(|a| a == "--headless=new"));
        assert!(chrome_args.iter().any(|a| a == "--no-sandbox"));
        assert_eq!(caps["moz:firefoxOptions"]["args"][0], "-headless");

        let caps = capabilities(false);
        let chrome_args = caps["goog:chromeOptions"]["args"].as_array().unwrap();
        assert!(!chrome_args.iter().any(|a| a == "--headless=new"));
    }
}
