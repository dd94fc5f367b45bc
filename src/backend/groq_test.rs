use super::*;

#[tokio::test]
async fn test_complete() {
    let mut server = mockito::Server::new_async().await;
    let handler = server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .match_header("Authorization", "Bearer test_token")
        .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"Fast answer."}}]}"#)
        .create();

    let backend = Groq::default()
        .with_endpoint(&server.url())
        .with_api_key("test_token")
        .with_model("llama-3.3-70b-versatile");

    let res = backend.complete("Hello").await.expect("completion failed");
    assert_eq!(res, "Fast answer.");
    handler.assert();
}

#[tokio::test]
async fn test_complete_error_fallback() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(503)
        .with_body("service unavailable")
        .create();

    let backend = Groq::default()
        .with_endpoint(&server.url())
        .with_api_key("test_token")
        .with_model("llama-3.3-70b-versatile");

    let err = backend.complete("Hello").await.unwrap_err();
    assert_eq!(err.to_string(), "Groq API error: 503");
}
