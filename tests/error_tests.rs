// Error handling tests

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use serde_json::Value;
use vision_relay::error::RelayError;

async fn body_json(error: RelayError) -> (StatusCode, Value) {
    let response = error.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[test]
fn test_error_display_messages() {
    let errors = vec![
        RelayError::InvalidRequest("Bad request".to_string()),
        RelayError::Unauthorized,
        RelayError::TooManyRequests {
            message: "Rate limited".to_string(),
            retry_after: None,
        },
        RelayError::Upstream("Provider down".to_string()),
        RelayError::Config("missing key".to_string()),
        RelayError::Internal("oops".to_string()),
    ];

    for error in errors {
        let display = format!("{}", error);
        assert!(!display.is_empty(), "Error should have display message");
    }
}

#[tokio::test]
async fn test_invalid_request_body() {
    let (status, body) =
        body_json(RelayError::InvalidRequest("Missing or invalid image data URL".to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Missing or invalid image data URL");
    assert_eq!(body.as_object().unwrap().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_body() {
    let (status, body) = body_json(RelayError::Unauthorized).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
}

#[tokio::test]
async fn test_upstream_is_server_error() {
    let (status, body) = body_json(RelayError::Upstream("Connection refused".to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Connection refused");
}

#[tokio::test]
async fn test_rate_limit_without_retry_hint() {
    let response = RelayError::TooManyRequests {
        message: "Too many requests".to_string(),
        retry_after: None,
    }
    .into_response();
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(!response.headers().contains_key("retry-after"));
}
