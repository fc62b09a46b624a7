// Relay API request/response types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /analyze`.
///
/// Both fields are optional at the serde level so a missing image is
/// reported as a validation error rather than a parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub image_data_url: Option<String>,

    #[serde(default)]
    pub prompt: Option<String>,
}

/// Successful `/analyze` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    /// Text generated by the model, or a placeholder when it produced none.
    pub text: String,

    /// Provider response, relayed untouched.
    pub raw: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}
