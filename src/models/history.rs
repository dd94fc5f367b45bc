use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::models::{ActionKind, PageContext};

/// One persisted record of a completed LLM exchange. Append-once,
/// immutable once written.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub timestamp: String,
    pub action: ActionKind,
    pub input_text: String,
    pub prompt: String,
    pub response: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub page_url: Option<String>,
    #[serde(default)]
    pub page_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_modification: Option<bool>,
}

impl HistoryEntry {
    pub fn new(
        action: ActionKind,
        input_text: impl Into<String>,
        prompt: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            action,
            input_text: input_text.into(),
            prompt: prompt.into(),
            response: response.into(),
            provider: "unknown".to_string(),
            model: "unknown".to_string(),
            page_url: None,
            page_title: None,
            is_modification: None,
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_page(mut self, page: &PageContext) -> Self {
        self.page_url = page.url.clone();
        self.page_title = page.title.clone();
        self
    }

    pub fn as_modification(mut self) -> Self {
        self.is_modification = Some(true);
        self
    }

    pub fn is_modification(&self) -> bool {
        self.is_modification.unwrap_or(false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One message of the sidebar chat transcript. The transcript is kept
/// separate from the response history and is not capped.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: String,
}

impl ChatMessage {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}
