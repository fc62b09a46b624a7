// Responses API client tests against a mock HTTP server

use mockito::Matcher;
use serde_json::json;
use vision_relay::config::ProviderConfig;
use vision_relay::error::RelayError;
use vision_relay::models::ResponsesRequest;
use vision_relay::openai::{OpenAiClient, VisionProvider};

const JPEG_DATA_URL: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRgABAQAAAQABAAD/2wBDAAgGBgcGBQgH";

fn client_for(server: &mockito::Server) -> OpenAiClient {
    let config = ProviderConfig {
        api_key: Some("sk-test-key".to_string()),
        api_base_url: format!("{}/v1", server.url()),
        timeout_seconds: 5,
        ..Default::default()
    };
    OpenAiClient::new(&config).unwrap()
}

fn sample_request() -> ResponsesRequest {
    ResponsesRequest::image_analysis(
        "gpt-4o-mini",
        "What can I cook?",
        JPEG_DATA_URL,
        Some("high".to_string()),
    )
}

#[tokio::test]
async fn test_posts_responses_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/responses")
        .match_header("authorization", "Bearer sk-test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "model": "gpt-4o-mini",
            "input": [{
                "role": "user",
                "content": [
                    { "type": "input_text", "text": "What can I cook?" },
                    { "type": "input_image", "image_url": JPEG_DATA_URL, "detail": "high" }
                ]
            }]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "id": "resp_1",
                "output": [{
                    "type": "message",
                    "content": [{ "type": "output_text", "text": "Omelette." }]
                }]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let raw = client_for(&server)
        .create_response(&sample_request())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(raw["id"], "resp_1");
    assert_eq!(raw["output"][0]["content"][0]["text"], "Omelette.");
}

#[tokio::test]
async fn test_error_status_uses_provider_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/responses")
        .with_status(400)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "error": {
                    "message": "Invalid image.",
                    "type": "invalid_request_error",
                    "param": "input",
                    "code": null
                }
            })
            .to_string(),
        )
        .create_async()
        .await;

    let err = client_for(&server)
        .create_response(&sample_request())
        .await
        .unwrap_err();

    match err {
        RelayError::Upstream(message) => {
            assert!(message.contains("400"));
            assert!(message.contains("Invalid image."));
        }
        other => panic!("expected upstream error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_status_without_json_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/responses")
        .with_status(502)
        .with_body("<html>Bad Gateway</html>")
        .create_async()
        .await;

    let err = client_for(&server)
        .create_response(&sample_request())
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Upstream(ref m) if m.contains("502")));
}

#[tokio::test]
async fn test_unparsable_success_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/responses")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = client_for(&server)
        .create_response(&sample_request())
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Upstream(_)));
}

#[tokio::test]
async fn test_no_retry_on_failure() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/responses")
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let result = client_for(&server).create_response(&sample_request()).await;

    assert!(result.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_connection_refused_is_upstream_error() {
    let config = ProviderConfig {
        api_key: Some("sk-test-key".to_string()),
        // reserved port, nothing listens here
        api_base_url: "http://127.0.0.1:9/v1".to_string(),
        timeout_seconds: 2,
        ..Default::default()
    };
    let client = OpenAiClient::new(&config).unwrap();

    let err = client.create_response(&sample_request()).await.unwrap_err();
    assert!(matches!(err, RelayError::Upstream(_)));
}
