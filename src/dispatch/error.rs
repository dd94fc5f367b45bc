#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::constants::ERROR_DISPLAY_LIMIT;

const GEMINI_QUOTA: &str = "Google Gemini quota exceeded (20 requests/day on free tier).\n\nSwitch to:\n- OpenRouter (free models available)\n- Groq (unlimited free tier)\n- Or wait ~36 seconds and try again";
const INVALID_KEY: &str = "Invalid API key. Please check your settings.";
const AUTH_FAILED: &str = "Authentication failed. Please check your API key in settings.";
const BILLING: &str = "Billing issue. Please check your account billing status.";

static RETRY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"retry in (\d+)").expect("retry regex is valid"));

/// Rewrites known provider error messages into friendlier ones with
/// remediation guidance. Unmatched messages pass through, truncated when
/// they are too long to display.
pub fn humanize(message: &str) -> String {
    if message.contains("quota") || message.contains("rate limit") {
        if message.contains("gemini") || message.contains("google") {
            return GEMINI_QUOTA.to_string();
        }
        if let Some(cap) = RETRY_RE.captures(message) {
            return format!(
                "Rate limit exceeded. Please wait {} seconds and try again.",
                &cap[1]
            );
        }
        return message.to_string();
    }

    if message.contains("API key") {
        return INVALID_KEY.to_string();
    }
    if message.contains("401") || message.contains("authentication") {
        return AUTH_FAILED.to_string();
    }
    if message.contains("402") || message.contains("billing") {
        return BILLING.to_string();
    }

    if message.chars().count() > ERROR_DISPLAY_LIMIT {
        let head: String = message.chars().take(ERROR_DISPLAY_LIMIT).collect();
        return format!("{}...\n\nCheck the log for the full error.", head);
    }

    message.to_string()
}
