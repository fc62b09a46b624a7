// Inference provider module

mod client;

pub use client::OpenAiClient;

use crate::error::Result;
use crate::models::ResponsesRequest;
use async_trait::async_trait;
use serde_json::Value;

/// A backend that can answer a single multimodal Responses API request.
///
/// The server only depends on this trait, so tests can swap in a stub
/// instead of calling the real API.
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Submit `request` and return the provider's raw JSON response.
    async fn create_response(&self, request: &ResponsesRequest) -> Result<Value>;
}
