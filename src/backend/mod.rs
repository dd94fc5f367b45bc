pub mod anthropic;
pub mod gemini;
pub mod groq;
pub mod openai;
pub mod openrouter;

pub use anthropic::Anthropic;
pub use gemini::Gemini;
pub use groq::Groq;
pub use openai::OpenAI;
pub use openrouter::OpenRouter;

#[cfg(test)]
use mockall::{automock, predicate::*};

use crate::config::constants::REQUEST_TIMEOUT_SECS;
use crate::models::{ProviderKind, Settings};
use async_trait::async_trait;
use serde::Deserialize;
use std::{sync::Arc, time::Duration};
use thiserror::Error as ThisError;

/// Everything a provider call can fail with. Display text is what the
/// dispatcher humanizes for the user.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("No API key configured. Open the settings to set one up.")]
    MissingApiKey,
    #[error("No model selected. Please select a model in the settings.")]
    MissingModel,
    #[error("{provider} request timed out")]
    Timeout { provider: &'static str },
    #[error("communication failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("{message}")]
    Provider {
        provider: &'static str,
        status: u16,
        message: String,
    },
    #[error("Invalid response from {0} API")]
    InvalidResponse(&'static str),
}

impl Error {
    pub(crate) fn from_reqwest(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Error::Timeout { provider };
        }
        Error::Transport(err)
    }
}

/// Translates a prompt into a plain-text answer for exactly one provider.
/// Adding a provider means adding one more implementation, never touching
/// the dispatcher.
#[async_trait]
#[cfg_attr(test, automock)]
pub trait Backend {
    fn name(&self) -> &str;
    async fn complete(&self, prompt: &str) -> Result<String, Error>;
}

pub type ArcBackend = Arc<dyn Backend + Send + Sync>;

/// Resolves the active settings into a ready-to-call backend. A separate
/// trait so tests can substitute a mocked backend.
pub trait BackendFactory: Send + Sync {
    fn create(&self, settings: &Settings) -> Result<ArcBackend, Error>;
}

#[derive(Default)]
pub struct ProviderFactory;

impl BackendFactory for ProviderFactory {
    fn create(&self, settings: &Settings) -> Result<ArcBackend, Error> {
        new_backend(settings)
    }
}

pub fn new_backend(settings: &Settings) -> Result<ArcBackend, Error> {
    // Fail fast before any network call.
    let api_key = settings
        .api_key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(Error::MissingApiKey)?;
    let model = settings.model_or_default();
    let timeout = Duration::from_secs(REQUEST_TIMEOUT_SECS);

    let backend: ArcBackend = match settings.provider {
        ProviderKind::OpenAI => Arc::new(
            OpenAI::default()
                .with_api_key(api_key)
                .with_model(&model)
                .with_timeout(timeout),
        ),
        ProviderKind::Anthropic => Arc::new(
            Anthropic::default()
                .with_api_key(api_key)
                .with_model(&model)
                .with_timeout(timeout),
        ),
        ProviderKind::Groq => Arc::new(
            Groq::default()
                .with_api_key(api_key)
                .with_model(&model)
                .with_timeout(timeout),
        ),
        ProviderKind::Google => Arc::new(
            Gemini::default()
                .with_api_key(api_key)
                .with_model(&model)
                .with_timeout(timeout),
        ),
        ProviderKind::OpenRouter => Arc::new(
            OpenRouter::default()
                .with_api_key(api_key)
                .with_model(&model)
                .with_timeout(timeout),
        ),
    };
    Ok(backend)
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Extracts the provider's human-readable message from an error body,
/// falling back to a generic `<provider> API error: <status>` string when
/// the envelope does not parse.
pub(crate) fn error_message(provider: &str, status: u16, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| format!("{} API error: {}", provider, status))
}
