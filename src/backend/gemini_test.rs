use super::*;

fn setup_backend(url: &str) -> Gemini {
    Gemini::default()
        .with_endpoint(url)
        .with_api_key("test_token")
        .with_model("gemini-2.0-flash-exp")
}

#[tokio::test]
async fn test_complete() {
    let body = serde_json::json!({
        "candidates": [
            { "content": { "parts": [{ "text": "Verified." }], "role": "model" } }
        ]
    });

    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock(
            "POST",
            "/v1beta/models/gemini-2.0-flash-exp:generateContent",
        )
        .match_query(mockito::Matcher::UrlEncoded(
            "key".into(),
            "test_token".into(),
        ))
        .with_status(200)
        .with_body(body.to_string())
        .create();

    let backend = setup_backend(&server.url());
    let res = backend.complete("Hello").await.expect("completion failed");

    assert_eq!(res, "Verified.");
    handler.assert();
}

#[tokio::test]
async fn test_complete_requires_model() {
    let backend = Gemini::default().with_api_key("test_token");
    let err = backend.complete("Hello").await.unwrap_err();
    assert!(matches!(err, Error::MissingModel));
}

#[tokio::test]
async fn test_complete_error_envelope() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock(
            "POST",
            "/v1beta/models/gemini-2.0-flash-exp:generateContent",
        )
        .match_query(mockito::Matcher::Any)
        .with_status(429)
        .with_body(
            r#"{"error":{"code":429,"message":"gemini quota exceeded, retry in 36 seconds","status":"RESOURCE_EXHAUSTED"}}"#,
        )
        .create();

    let backend = setup_backend(&server.url());
    let err = backend.complete("Hello").await.unwrap_err();

    match err {
        Error::Provider {
            status, message, ..
        } => {
            assert_eq!(status, 429);
            assert!(message.contains("gemini quota exceeded"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_complete_error_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock(
            "POST",
            "/v1beta/models/gemini-2.0-flash-exp:generateContent",
        )
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .with_body("<html>oops</html>")
        .create();

    let backend = setup_backend(&server.url());
    let err = backend.complete("Hello").await.unwrap_err();

    assert_eq!(err.to_string(), "Google API error: 500");
}

#[tokio::test]
async fn test_complete_invalid_response() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock(
            "POST",
            "/v1beta/models/gemini-2.0-flash-exp:generateContent",
        )
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"candidates":[{"finishReason":"SAFETY"}]}"#)
        .create();

    let backend = setup_backend(&server.url());
    let err = backend.complete("Hello").await.unwrap_err();

    assert!(matches!(err, Error::InvalidResponse("Google")));
}
