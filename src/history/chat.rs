#[cfg(test)]
#[path = "chat_test.rs"]
mod tests;

use eyre::Result;
use serde_json::Value;

use crate::models::ChatMessage;
use crate::storage::ArcStorage;

const CHAT_KEY: &str = "sidebarChatHistory";

/// Sidebar chat transcript. Unbounded and kept apart from the response
/// history.
#[derive(Clone)]
pub struct ChatLog {
    storage: ArcStorage,
}

impl ChatLog {
    pub fn new(storage: ArcStorage) -> Self {
        Self { storage }
    }

    pub async fn append(&self, message: ChatMessage) -> Result<()> {
        let mut messages = self.read_raw().await?;
        messages.push(serde_json::to_value(&message)?);
        self.storage.set(CHAT_KEY, Value::Array(messages)).await
    }

    pub async fn get_all(&self) -> Result<Vec<ChatMessage>> {
        let messages = self
            .read_raw()
            .await?
            .into_iter()
            .filter_map(|v| serde_json::from_value::<ChatMessage>(v).ok())
            .collect();
        Ok(messages)
    }

    async fn read_raw(&self) -> Result<Vec<Value>> {
        match self.storage.get(CHAT_KEY).await? {
            Some(Value::Array(messages)) => Ok(messages),
            Some(_) => {
                log::warn!("persisted chat transcript was not an array, resetting to empty");
                Ok(vec![])
            }
            None => Ok(vec![]),
        }
    }
}
