use super::*;

fn setup_backend(url: &str) -> OpenAI {
    OpenAI::default()
        .with_endpoint(url)
        .with_api_key("test_token")
        .with_model("gpt-4o-mini")
}

#[tokio::test]
async fn test_complete() {
    let body = serde_json::json!({
        "choices": [
            { "message": { "role": "assistant", "content": "Hello there!" } }
        ]
    });

    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .match_header("Authorization", "Bearer test_token")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "model": "gpt-4o-mini",
            "max_tokens": 500,
            "messages": [{ "role": "user", "content": "Hello" }],
        })))
        .with_body(body.to_string())
        .create();

    let backend = setup_backend(&server.url());
    let res = backend.complete("Hello").await.expect("completion failed");

    assert_eq!(res, "Hello there!");
    handler.assert();
}

#[tokio::test]
async fn test_complete_error_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(429)
        .with_body(r#"{"error":{"message":"You exceeded your current quota","type":"insufficient_quota"}}"#)
        .create();

    let backend = setup_backend(&server.url());
    let err = backend.complete("Hello").await.unwrap_err();

    match err {
        Error::Provider {
            status, message, ..
        } => {
            assert_eq!(status, 429);
            assert_eq!(message, "You exceeded your current quota");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_error_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(500)
        .with_body("not json")
        .create();

    let backend = setup_backend(&server.url());
    let err = backend.complete("Hello").await.unwrap_err();

    assert_eq!(err.to_string(), "OpenAI API error: 500");
}

#[tokio::test]
async fn test_complete_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_body(r#"{"choices":[]}"#)
        .create();

    let backend = setup_backend(&server.url());
    let err = backend.complete("Hello").await.unwrap_err();

    assert!(matches!(err, Error::InvalidResponse("OpenAI")));
}
