use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One external LLM HTTP backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum ProviderKind {
    #[default]
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "anthropic")]
    Anthropic,
    #[serde(rename = "groq")]
    Groq,
    #[serde(rename = "google")]
    Google,
    #[serde(rename = "openrouter")]
    OpenRouter,
}

impl ProviderKind {
    /// Model used when none is configured.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenAI => "gpt-4o-mini",
            ProviderKind::Anthropic => "claude-3-5-haiku-20241022",
            ProviderKind::Groq => "llama-3.3-70b-versatile",
            ProviderKind::Google => "gemini-2.0-flash-exp",
            ProviderKind::OpenRouter => "google/gemini-2.0-flash-exp:free",
        }
    }
}

impl Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ProviderKind::OpenAI => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Groq => "groq",
            ProviderKind::Google => "google",
            ProviderKind::OpenRouter => "openrouter",
        };
        write!(f, "{}", name)
    }
}

/// Snapshot of the persisted settings keys. Prompt overrides apply to the
/// summarize/reply/comment templates only; the fact-check template is
/// always the built-in one.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub prompt_summarize: Option<String>,
    #[serde(default)]
    pub prompt_reply: Option<String>,
    #[serde(default)]
    pub prompt_comment: Option<String>,
}

impl Settings {
    pub fn model_or_default(&self) -> String {
        self.model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(self.provider.default_model())
            .to_string()
    }
}
