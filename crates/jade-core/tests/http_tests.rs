use std::time::Duration;

use jade_core::{
    AsyncGptClient, AsyncHttpConnector, ClientConfig, ErrorKind, GptClient, HttpConnector,
    LlmError, QueryOptions,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, header, method, path},
};

fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::new("sk-test").with_base_url(format!("{}/v1", server.uri()))
}

fn async_client(server: &MockServer) -> AsyncGptClient {
    AsyncGptClient::with_config(config_for(server), AsyncHttpConnector).unwrap()
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    }))
}

#[tokio::test]
async fn async_client_posts_expected_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "What is the capital of France?" }],
            "model": "gpt-3.5-turbo"
        })))
        .respond_with(completion("Paris is the capital of France."))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = async_client(&server);
    client.connect().await.unwrap();
    let answer = client.query("What is the capital of France?").await;
    client.close().await.unwrap();

    assert_eq!(answer.unwrap(), "Paris is the capital of France.");
}

#[tokio::test]
async fn async_client_maps_rate_limit_to_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("Rate limit reached"))
        .expect(1)
        .mount(&server)
        .await;

    let mut client = async_client(&server);
    let err = client
        .scoped(|client| Box::pin(async move { client.query("hello").await }))
        .await
        .unwrap_err();

    match err {
        LlmError::Status { status, body } => {
            assert_eq!(status, 429);
            assert_eq!(body, "Rate limit reached");
        }
        other => panic!("Expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn async_client_rejects_non_200_success_codes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "choices": [{ "message": { "content": "created" } }]
        })))
        .mount(&server)
        .await;

    let mut client = async_client(&server);
    client.connect().await.unwrap();
    let err = client.query("hello").await.unwrap_err();

    assert_eq!(err.status_code(), Some(201));
}

#[tokio::test]
async fn async_client_maps_missing_choices_to_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "oops" })))
        .mount(&server)
        .await;

    let mut client = async_client(&server);
    client.connect().await.unwrap();
    let err = client.query("hello").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Protocol);
}

#[tokio::test]
async fn per_call_timeout_surfaces_as_network_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion("late").set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let mut client = async_client(&server);
    client.connect().await.unwrap();
    let options = QueryOptions::new().timeout(Duration::from_millis(50));
    let err = client.query_with("hello", &options).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(err.is_timeout());
}

#[tokio::test]
async fn unreachable_host_is_network_error() {
    let config = ClientConfig::new("sk-test").with_base_url("http://127.0.0.1:1/v1");
    let mut client = AsyncGptClient::with_config(config, AsyncHttpConnector).unwrap();
    client.connect().await.unwrap();

    let err = client.query("hello").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Network);
    assert!(!err.is_timeout());
}

#[tokio::test(flavor = "multi_thread")]
async fn blocking_client_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(completion("Paris is the capital of France."))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server);
    let answer = tokio::task::spawn_blocking(move || {
        let mut client = GptClient::with_config(config, HttpConnector).unwrap();
        client.scoped(|client| client.query("What is the capital of France?"))
    })
    .await
    .unwrap();

    assert_eq!(answer.unwrap(), "Paris is the capital of France.");
}

#[tokio::test(flavor = "multi_thread")]
async fn blocking_client_maps_status_and_shape_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "limited" }],
            "model": "gpt-3.5-turbo"
        })))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_json(json!({
            "messages": [{ "role": "user", "content": "odd" }],
            "model": "gpt-3.5-turbo"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "oops" })))
        .mount(&server)
        .await;

    let config = config_for(&server);
    let (limited, odd) = tokio::task::spawn_blocking(move || {
        let mut client = GptClient::with_config(config, HttpConnector).unwrap();
        let session = client.session().unwrap();
        (session.query("limited"), session.query("odd"))
    })
    .await
    .unwrap();

    assert_eq!(limited.unwrap_err().status_code(), Some(429));
    assert_eq!(odd.unwrap_err().kind(), ErrorKind::Protocol);
}
