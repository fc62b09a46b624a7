// OpenAI Responses API client

use super::VisionProvider;
use crate::config::ProviderConfig;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::ResponsesRequest;
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for the OpenAI Responses API.
///
/// One pooled HTTP client is shared by every request. Calls are made once;
/// failures are returned to the caller without retrying.
pub struct OpenAiClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl OpenAiClient {
    pub fn new(config: &ProviderConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| RelayError::Config("provider API key is not set".to_string()))?;

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| RelayError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created provider HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        #[derive(serde::Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(serde::Deserialize)]
        struct ErrorDetail {
            message: Option<String>,
            code: Option<String>,
        }

        let error = serde_json::from_str::<ErrorResponse>(response_text)
            .ok()?
            .error?;
        error.message.or(error.code)
    }

    async fn send(&self, request: &ResponsesRequest) -> Result<Value> {
        let url = format!("{}/responses", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                metrics::record_upstream_call("transport_error");
                RelayError::Upstream(format!("Provider request failed: {}", e))
            })?;

        let status = response.status();
        metrics::record_upstream_call(status.as_str());

        let response_text = response
            .text()
            .await
            .map_err(|e| RelayError::Upstream(format!("Failed to read provider response: {}", e)))?;

        if !status.is_success() {
            error!(
                "Provider error: HTTP {} - Response body: {}",
                status,
                sanitize(&response_text)
            );
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(RelayError::Upstream(format!(
                "Provider error ({}): {}",
                status.as_u16(),
                message
            )));
        }

        debug!(
            "Raw provider response (first 500 chars): {}",
            response_text.chars().take(500).collect::<String>()
        );

        serde_json::from_str(&response_text).map_err(|e| {
            error!("Failed to parse provider response: {}", e);
            RelayError::Upstream(format!("Unreadable provider response: {}", e))
        })
    }
}

#[async_trait]
impl VisionProvider for OpenAiClient {
    async fn create_response(&self, request: &ResponsesRequest) -> Result<Value> {
        debug!("Calling Responses API with model {}", request.model);

        let start = Instant::now();
        let result = self.send(request).await;
        metrics::observe_upstream_duration(&request.model, start.elapsed().as_secs_f64());

        result
    }
}
