//! Configuration data structures for vision-relay.
//!
//! This module defines the schema for the application settings: the HTTP
//! listener, the upstream inference provider, request hygiene (shared secret
//! and rate limiting) and logging.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, body limit).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream OpenAI Responses API settings.
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Access control and traffic shaping.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `0.0.0.0`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8787`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body. Base64 images are big.
    /// Default: `10485760` (10 MiB)
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

/// Settings for the upstream inference provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Bearer key for the provider. Required at startup.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Base URL of the provider API (without the `/responses` suffix).
    /// Default: `https://api.openai.com/v1`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Multimodal model used for every analysis.
    /// Default: `gpt-4o-mini`
    #[serde(default = "default_model")]
    pub model: String,

    /// Image fidelity hint sent with the image (`low`, `high`, `auto`).
    /// Default: `high`
    #[serde(default = "default_image_detail")]
    pub image_detail: String,

    /// Prompt used when the caller does not send one.
    #[serde(default = "default_prompt")]
    pub default_prompt: String,

    /// Request timeout in seconds.
    /// Default: `120`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

/// Settings for request gating.
#[derive(Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Shared secret expected in the `x-app-token` header. Unset or empty
    /// disables the check.
    #[serde(default)]
    pub app_token: Option<String>,

    /// Requests per minute allowed from one client address. `0` disables
    /// rate limiting.
    /// Default: `60`
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Use the first `X-Forwarded-For` entry as the client address.
    /// Only enable behind a proxy that sets it.
    /// Default: `false`
    #[serde(default)]
    pub trust_forwarded_for: bool,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl SecurityConfig {
    /// The configured shared secret, if access control is enabled.
    pub fn required_token(&self) -> Option<&str> {
        self.app_token.as_deref().filter(|t| !t.is_empty())
    }
}

// Secrets never reach logs through Debug

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_base_url", &self.api_base_url)
            .field("model", &self.model)
            .field("image_detail", &self.image_detail)
            .field("default_prompt", &self.default_prompt)
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("app_token", &self.app_token.as_ref().map(|_| "[REDACTED]"))
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base_url: default_api_base_url(),
            model: default_model(),
            image_detail: default_image_detail(),
            default_prompt: default_prompt(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            app_token: None,
            rate_limit_per_minute: default_rate_limit(),
            trust_forwarded_for: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_body_limit() -> usize {
    10 * 1024 * 1024
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_detail() -> String {
    "high".to_string()
}

fn default_prompt() -> String {
    "Give recipes for the ingredients in the image.".to_string()
}

fn default_timeout() -> u64 {
    120
}

fn default_rate_limit() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
