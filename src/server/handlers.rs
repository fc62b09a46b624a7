// HTTP request handlers

use super::routes::AppState;
use crate::error::{RelayError, Result};
use crate::metrics;
use crate::models::openai::NO_TEXT_OUTPUT;
use crate::models::{extract_output_text, AnalyzeRequest, AnalyzeResponse, HealthResponse, ResponsesRequest};
use crate::vision::require_image_data_url;
use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{debug, error, info, warn};

pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

pub async fn metrics_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics::gather_metrics(),
    )
}

/// Handler for `POST /analyze`
pub async fn analyze_handler(
    State(state): State<AppState>,
    body: std::result::Result<Bytes, BytesRejection>, // parsed by hand so every bad body gets our error shape
) -> Result<Json<AnalyzeResponse>> {
    let result = match body {
        Ok(bytes) => analyze(&state, &bytes).await,
        Err(rejection) => Err(body_rejection(rejection)),
    };

    let status = match &result {
        Ok(_) => 200,
        Err(e) => e.status_code().as_u16(),
    };
    metrics::record_analyze(status);

    result.map(Json)
}

fn body_rejection(rejection: BytesRejection) -> RelayError {
    warn!("Failed to read analyze request body: {}", rejection.body_text());
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        metrics::record_rejection("payload_too_large");
        RelayError::PayloadTooLarge
    } else {
        metrics::record_rejection("invalid_request");
        RelayError::InvalidRequest(rejection.body_text())
    }
}

async fn analyze(state: &AppState, body: &[u8]) -> Result<AnalyzeResponse> {
    let req: AnalyzeRequest = serde_json::from_slice(body).map_err(|e| {
        warn!("Failed to deserialize analyze request: {}", e);
        metrics::record_rejection("invalid_request");
        RelayError::InvalidRequest(format!("Invalid JSON body: {}", e))
    })?;

    let image = require_image_data_url(req.image_data_url.as_deref()).map_err(|e| {
        debug!("Rejected analyze request: {}", e);
        metrics::record_rejection("invalid_request");
        e
    })?;

    info!(
        mime_type = %image.mime_type,
        approx_bytes = image.approx_bytes(),
        format = image.format().map_or("unrecognized", |f| f.mime_type()),
        custom_prompt = req.prompt.is_some(),
        "Received analyze request"
    );

    let provider = &state.config.provider;
    let prompt = req
        .prompt
        .unwrap_or_else(|| provider.default_prompt.clone());
    let detail = Some(provider.image_detail.clone()).filter(|d| !d.is_empty());
    let request = ResponsesRequest::image_analysis(&provider.model, prompt, image.url, detail);

    let raw = state.provider.create_response(&request).await.map_err(|e| {
        error!("Provider call failed: {}", e);
        match e {
            RelayError::Upstream(_) => e,
            other => RelayError::Upstream(other.to_string()),
        }
    })?;

    let text = extract_output_text(&raw).unwrap_or_else(|| {
        warn!("Provider response contained no output text");
        NO_TEXT_OUTPUT.to_string()
    });

    debug!("Analyze request completed ({} chars)", text.len());
    Ok(AnalyzeResponse { text, raw })
}
