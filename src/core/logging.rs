//! Logging configuration and initialization
//!
//! Sets up the tracing subscriber used by the relay and by the HTTP trace
//! layer on the router.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for the relay when `RUST_LOG` is unset
///
/// The HTTP trace layer logs at debug, so it is only enabled together with
/// debug logging for the relay itself.
fn default_directive(level: &str) -> String {
    if level == "debug" || level == "trace" {
        format!("{level},tower_http={level}")
    } else {
        format!("{level},tower_http=warn")
    }
}

/// Map a configured level name onto a tracing level
///
/// Accepts the usual aliases ("warning", "critical") and ignores anything
/// after the first word so `log_level = "debug # verbose"` still works.
/// Unknown values fall back to "info".
pub fn normalize_level(log_level: &str) -> &'static str {
    let level = log_level
        .split_whitespace()
        .next()
        .unwrap_or("info")
        .to_lowercase();

    match level.as_str() {
        "trace" => "trace",
        "debug" => "debug",
        "info" => "info",
        "warn" | "warning" => "warn",
        "error" | "critical" => "error",
        _ => "info",
    }
}

/// Initialize the logging system with the specified level
///
/// `RUST_LOG`, when set, takes precedence over the configured level.
pub fn init_logging(log_level: &str) {
    let level = normalize_level(log_level);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
