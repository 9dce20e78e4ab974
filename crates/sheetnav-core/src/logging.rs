#![forbid(unsafe_code)]

//! JSON logging bootstrap for production builds.
//!
//! Installs a global `tracing` subscriber that writes one JSON object per
//! event to stderr. The filter comes from `SHEETNAV_LOG`, then `RUST_LOG`,
//! then defaults to `info`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

/// Environment variable consulted first for the log filter.
pub const LOG_ENV: &str = "SHEETNAV_LOG";

/// Build the filter from the environment.
#[must_use]
pub fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the JSON subscriber.
///
/// Returns an error if a global subscriber was already set.
pub fn try_init_json() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(env_filter())
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .try_init()
}
