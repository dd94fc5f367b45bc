#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;

use eyre::Result;
use serde_json::{Value, json};

use crate::models::{ProviderKind, Settings};
use crate::storage::ArcStorage;

const KEY_PROVIDER: &str = "provider";
const KEY_API_KEY: &str = "apiKey";
const KEY_MODEL: &str = "model";
const KEY_PROMPT_SUMMARIZE: &str = "promptSummarize";
const KEY_PROMPT_REPLY: &str = "promptReply";
const KEY_PROMPT_COMMENT: &str = "promptComment";

/// Typed view over the persisted settings keys.
#[derive(Clone)]
pub struct SettingsStore {
    storage: ArcStorage,
}

impl SettingsStore {
    pub fn new(storage: ArcStorage) -> Self {
        Self { storage }
    }

    pub async fn load(&self) -> Result<Settings> {
        let provider = match self.storage.get(KEY_PROVIDER).await? {
            Some(value) => serde_json::from_value::<ProviderKind>(value.clone())
                .unwrap_or_else(|_| {
                    log::warn!("unknown provider {}, falling back to default", value);
                    ProviderKind::default()
                }),
            None => ProviderKind::default(),
        };

        Ok(Settings {
            provider,
            api_key: self.get_string(KEY_API_KEY).await?,
            model: self.get_string(KEY_MODEL).await?,
            prompt_summarize: self.get_string(KEY_PROMPT_SUMMARIZE).await?,
            prompt_reply: self.get_string(KEY_PROMPT_REPLY).await?,
            prompt_comment: self.get_string(KEY_PROMPT_COMMENT).await?,
        })
    }

    pub async fn save(&self, settings: &Settings) -> Result<()> {
        self.storage
            .set(KEY_PROVIDER, json!(settings.provider))
            .await?;
        self.set_string(KEY_API_KEY, settings.api_key.as_deref())
            .await?;
        self.set_string(KEY_MODEL, settings.model.as_deref())
            .await?;
        self.set_string(KEY_PROMPT_SUMMARIZE, settings.prompt_summarize.as_deref())
            .await?;
        self.set_string(KEY_PROMPT_REPLY, settings.prompt_reply.as_deref())
            .await?;
        self.set_string(KEY_PROMPT_COMMENT, settings.prompt_comment.as_deref())
            .await?;
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        let value = self.storage.get(key).await?;
        Ok(value.and_then(|v| match v {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }))
    }

    async fn set_string(&self, key: &str, value: Option<&str>) -> Result<()> {
        match value {
            Some(value) => self.storage.set(key, json!(value)).await,
            None => self.storage.remove(key).await,
        }
    }
}
