//! # Telemetry Bootstrap
//!
//! One-shot `tracing-subscriber` initialization for host applications.
//! Filtering comes from `KEEL_LOG` (standard `EnvFilter` syntax, default
//! `info`); `KEEL_LOG_JSON=true` switches to JSON output for log shippers.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Safe to call more than once: subsequent calls are no-ops rather than
/// panics, so tests and embedded hosts can both call it freely.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("KEEL_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let json = std::env::var("KEEL_LOG_JSON")
        .map(|v| v.to_lowercase() == "true" || v == "1")
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("tracing subscriber already initialized");
    }
}
