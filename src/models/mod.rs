//! Data models for the relay API and the upstream provider.
//!
//! - `analyze`: inbound `/analyze` and `/health` bodies
//! - `openai`: OpenAI Responses API request types and output extraction

pub mod analyze;
pub mod openai;

pub use analyze::{AnalyzeRequest, AnalyzeResponse, HealthResponse};
pub use openai::{extract_output_text, InputContent, InputMessage, ResponsesRequest};
