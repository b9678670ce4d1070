use smartfix_relay::llm::{
    ChatMessage, CompletionError, CompletionProvider, CompletionRequest, OpenAiClient,
};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_request() -> CompletionRequest {
    CompletionRequest {
        model: "gpt-3.5-turbo".to_string(),
        messages: vec![
            ChatMessage::system("You are a helpful AI bot."),
            ChatMessage::user("Where are you located?"),
        ],
        max_tokens: 200,
    }
}

fn test_client(base_url: &str) -> OpenAiClient {
    OpenAiClient::new(
        Some("sk-test".to_string()),
        base_url,
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_complete_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(serde_json::json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 200,
            "messages": [
                {"role": "system", "content": "You are a helpful AI bot."},
                {"role": "user", "content": "Where are you located?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "  Jalan Majapahit No. 83.\n"},
                "finish_reason": "stop"
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let answer = test_client(&server.uri())
        .complete(&test_request())
        .await
        .unwrap();
    assert_eq!(answer, "Jalan Majapahit No. 83.");
}

#[tokio::test]
async fn test_complete_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .expect(1)
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete(&test_request())
        .await
        .unwrap_err();
    match err {
        CompletionError::Api { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_complete_no_choices() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete(&test_request())
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::EmptyResponse));
}

#[tokio::test]
async fn test_complete_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .complete(&test_request())
        .await
        .unwrap_err();
    assert!(matches!(err, CompletionError::Transport(_)));
}

#[tokio::test]
async fn test_missing_key_skips_network() {
    let client = OpenAiClient::new(None, "http://127.0.0.1:1", Duration::from_secs(1));
    let err = client.complete(&test_request()).await.unwrap_err();
    assert!(matches!(err, CompletionError::MissingApiKey));
}
