use super::*;

#[test]
fn test_gemini_quota() {
    let msg = humanize("gemini quota exceeded, retry in 36 seconds");
    assert!(msg.contains("Google Gemini quota exceeded"));
    assert!(msg.contains("OpenRouter"));
}

#[test]
fn test_google_rate_limit() {
    let msg = humanize("google rate limit reached");
    assert!(msg.contains("Google Gemini quota exceeded"));
}

#[test]
fn test_rate_limit_with_retry_hint() {
    let msg = humanize("quota exceeded, please retry in 42 seconds");
    assert_eq!(
        msg,
        "Rate limit exceeded. Please wait 42 seconds and try again."
    );
}

#[test]
fn test_quota_without_known_provider_passes_through() {
    let msg = humanize("quota reached for tier");
    assert_eq!(msg, "quota reached for tier");
}

#[test]
fn test_invalid_api_key() {
    let msg = humanize("No API key configured. Open the settings to set one up.");
    assert_eq!(msg, "Invalid API key. Please check your settings.");
}

#[test]
fn test_authentication_failure() {
    assert_eq!(
        humanize("server returned 401"),
        "Authentication failed. Please check your API key in settings."
    );
    assert_eq!(
        humanize("authentication required"),
        "Authentication failed. Please check your API key in settings."
    );
}

#[test]
fn test_billing_failure() {
    assert_eq!(
        humanize("402 payment required"),
        "Billing issue. Please check your account billing status."
    );
}

#[test]
fn test_long_message_truncated() {
    let long = "e".repeat(500);
    let msg = humanize(&long);

    assert!(msg.starts_with(&"e".repeat(200)));
    assert!(msg.ends_with("Check the log for the full error."));
    assert!(!msg.contains(&"e".repeat(201)));
}

#[test]
fn test_short_message_passes_through() {
    assert_eq!(humanize("connection refused"), "connection refused");
}
