//! Code Buddy relay
//!
//! Backend for the Code Buddy browser extension. Accepts problem text, code
//! and error messages, turns them into prompts for the Gemini API, and
//! reshapes the model's replies into JSON the extension renders. Also proxies
//! a single YouTube search for walkthrough videos.

mod api;
mod conversion;
mod core;
mod models;

use crate::api::endpoints::{AppState, create_router};
use crate::core::assistant::CodingAssistant;
use crate::core::config::Config;
use crate::core::logging::init_logging;
use crate::core::provider::{GenerationProvider, VideoSearch};
use crate::core::providers::{GeminiProvider, YouTubeClient};
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Check for --help flag
    if std::env::args().any(|arg| arg == "--help") {
        print_help();
        return;
    }

    let config = match Config::from_env() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.log_level);

    print_startup_banner(&config);

    let provider: Arc<dyn GenerationProvider> = match GeminiProvider::new(
        config.gemini_api_key.clone(),
        config.gemini_base_url.clone(),
        config.gemini_model.clone(),
        config.timeout(),
        config.retry_policy(),
    ) {
        Ok(provider) => Arc::new(provider),
        Err(e) => {
            error!("Failed to create Gemini client: {}", e);
            std::process::exit(1);
        }
    };

    let video_search: Arc<dyn VideoSearch> = match YouTubeClient::new(
        config.youtube_api_key.clone(),
        config.youtube_base_url.clone(),
        config.timeout(),
        config.retry_policy(),
    ) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to create YouTube client: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Using provider: {} ({})",
        provider.provider_name(),
        provider.model_name()
    );

    let app_state = AppState {
        config: config.clone(),
        assistant: CodingAssistant::new(provider),
        video_search,
    };

    let app = create_router(app_state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    info!("Server listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Print startup banner with configuration
fn print_startup_banner(config: &Config) {
    println!("🚀 Code Buddy relay v{}", env!("CARGO_PKG_VERSION"));
    println!("✅ Configuration loaded successfully");
    println!("   Gemini Model: {}", config.gemini_model);
    println!("   Gemini Base URL: {}", config.gemini_base_url);
    println!("   YouTube Base URL: {}", config.youtube_base_url);
    println!("   Request Timeout: {}s", config.request_timeout);
    println!(
        "   Retries: {} (initial backoff {}ms, x{})",
        config.max_retries, config.initial_backoff_ms, config.backoff_multiplier
    );
    println!("   Server: {}:{}", config.host, config.port);
    println!();
}

/// Print help message
fn print_help() {
    println!("Code Buddy relay v{}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Usage: code-buddy-relay [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --help    Display this help message");
    println!();
    println!("Configuration is read from CONFIG_PATH (default: config.toml, optional).");
    println!("A .env file in the working directory is loaded first.");
    println!();
    println!("Environment variables:");
    println!("  GEMINI_API_KEY  - Gemini API key (required unless set in [gemini] api_key)");
    println!("  YOUTUBE_API_KEY - YouTube Data API key (required unless set in [youtube] api_key)");
    println!("  CONFIG_PATH     - Path to the TOML configuration file");
    println!("  RUST_LOG        - Overrides the configured log filter");
    println!();
    println!("config.toml sections:");
    println!("  [gemini]  api_key, model (default: gemini-2.0-flash), base_url");
    println!("  [youtube] api_key, base_url");
    println!("  [server]  host (default: 0.0.0.0), port (default: 8000), log_level (default: info)");
    println!("  [request] request_timeout (default: 60), max_retries (default: 2),");
    println!("            initial_backoff_ms (default: 250), backoff_multiplier (default: 2.0)");
}
