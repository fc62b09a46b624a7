// vision-relay - Token-gated image analysis relay for the OpenAI Responses API

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod openai;
pub mod server;
pub mod utils;
pub mod vision;
