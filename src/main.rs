use clap::Parser;
use page_insight::{Analyzer, GeminiClient, MemoryStore, ScrapeResult, WebDriverRenderer};
use serde::Serialize;
use std::process::ExitCode;
use std::sync::Arc;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let config = match args.config() {
        Ok(config) => config,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            return ExitCode::from(2);
        }
    };
    let request = args.request();

    ::log::info!("Analyzing {} using WebDriver at {}", request.url, config.webdriver_url);

    let renderer = Arc::new(WebDriverRenderer::new(&config));
    let mut analyzer = Analyzer::new(renderer.clone())
        .with_store(Arc::new(MemoryStore::from_config(&config)));

    if request.options.include_ai_analysis {
        match GeminiClient::from_env(&config.gemini) {
            Some(client) => analyzer = analyzer.with_generator(Arc::new(client)),
            None => ::log::warn!(
                "{} is not set; AI analysis will be skipped",
                config.gemini.api_key_env
            ),
        }
    }
    let analyzer = analyzer.with_config(config);

    let started = std::time::Instant::now();
    let outcome = analyzer.analyze(&request).await;
    renderer.close().await;

    match outcome {
        Ok(result) => {
            ::log::info!(
                "Analysis complete in {:.2} seconds",
                started.elapsed().as_secs_f64()
            );
            print_json(&result, args.pretty);
            print_summary(&result);
            ExitCode::SUCCESS
        }
        Err(e) => {
            print_json(&e.report(), args.pretty);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match json {
        Ok(json) => println!("{}", json),
        Err(e) => ::log::error!("Failed to serialize output: {}", e),
    }
}

fn print_summary(result: &ScrapeResult) {
    ::log::debug!(
        "{}: {} words, {} min read, {} links ({} broken), seo score {}",
        result.data.url,
        result.analytics.total_words,
        result.analytics.reading_time,
        result.analytics.link_analysis.total_links,
        result.analytics.link_analysis.broken_links,
        result.analytics.seo_score
    );
}
