//! Structured logging and secret redaction.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides a helper that keeps provider API keys out of log output.

use crate::config::LoggingConfig;
use crate::error::{RelayError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports two output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| RelayError::Config(format!("invalid log level {:?}: {}", config.level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init(),
    };

    result.map_err(|e| RelayError::Internal(format!("failed to install logger: {}", e)))
}

/// Replaces API keys in `input` with `[REDACTED_API_KEY]`.
///
/// OpenAI keys start with `sk-` and run until whitespace or a quote.
pub fn sanitize(input: &str) -> String {
    const MARKER: &str = "sk-";
    const REPLACEMENT: &str = "[REDACTED_API_KEY]";

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(MARKER) {
        // only redact at a token boundary, not inside words like "task-"
        let at_boundary = rest[..pos]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_ascii_alphanumeric());

        result.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let end = tail
            .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
            .unwrap_or(tail.len());

        if at_boundary {
            result.push_str(REPLACEMENT);
            rest = &tail[end..];
        } else {
            result.push_str(MARKER);
            rest = &tail[MARKER.len()..];
        }
    }

    result.push_str(rest);
    result
}
