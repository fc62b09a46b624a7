// OpenAI Responses API type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder returned when the model produced no text.
pub const NO_TEXT_OUTPUT: &str = "No text output.";

/// Body of `POST /responses`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponsesRequest {
    /// Target model (e.g. "gpt-4o-mini").
    pub model: String,

    /// Input turns. The relay always sends exactly one user turn.
    pub input: Vec<InputMessage>,
}

/// A single input turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputMessage {
    pub role: String,
    pub content: Vec<InputContent>,
}

/// Mixed-modality content parts of an input turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputContent {
    InputText {
        text: String,
    },
    InputImage {
        /// Either an https URL or a `data:` URL.
        image_url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
}

impl ResponsesRequest {
    /// Build the single-turn "prompt + image" request.
    pub fn image_analysis(
        model: impl Into<String>,
        prompt: impl Into<String>,
        image_url: impl Into<String>,
        detail: Option<String>,
    ) -> Self {
        Self {
            model: model.into(),
            input: vec![InputMessage {
                role: "user".to_string(),
                content: vec![
                    InputContent::InputText {
                        text: prompt.into(),
                    },
                    InputContent::InputImage {
                        image_url: image_url.into(),
                        detail,
                    },
                ],
            }],
        }
    }
}

/// Pull the generated text out of a raw Responses API payload.
///
/// A top-level `output_text` string wins if present. Otherwise every
/// `output_text` part of every `message` item in `output[]` is concatenated
/// in order. Returns `None` when there is no non-empty text.
pub fn extract_output_text(response: &Value) -> Option<String> {
    if let Some(text) = response.get("output_text").and_then(Value::as_str) {
        if !text.is_empty() {
            return Some(text.to_string());
        }
    }

    let mut collected = String::new();
    for item in response.get("output")?.as_array()? {
        if item.get("type").and_then(Value::as_str) != Some("message") {
            continue;
        }
        let Some(parts) = item.get("content").and_then(Value::as_array) else {
            continue;
        };
        for part in parts {
            if part.get("type").and_then(Value::as_str) == Some("output_text") {
                if let Some(text) = part.get("text").and_then(Value::as_str) {
                    collected.push_str(text);
                }
            }
        }
    }

    if collected.is_empty() {
        None
    } else {
        Some(collected)
    }
}
