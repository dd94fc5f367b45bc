#[cfg(test)]
#[path = "store_test.rs"]
mod tests;

use eyre::{Result, bail};
use serde_json::Value;

use crate::config::constants::HISTORY_LIMIT;
use crate::models::HistoryEntry;
use crate::storage::ArcStorage;

const HISTORY_KEY: &str = "responseHistory";

/// Durable, capped, most-recent-first log of completed exchanges.
#[derive(Clone)]
pub struct HistoryStore {
    storage: ArcStorage,
}

impl HistoryStore {
    pub fn new(storage: ArcStorage) -> Self {
        Self { storage }
    }

    /// Inserts at the head and evicts beyond the cap. A persisted value
    /// that is not a well-formed array is reset to empty first. The write
    /// is verified by re-reading the head entry's timestamp; a mismatch is
    /// logged but never fails the caller.
    pub async fn append(&self, entry: HistoryEntry) -> Result<()> {
        let mut entries = self.read_raw().await?;
        entries.insert(0, serde_json::to_value(&entry)?);
        entries.truncate(HISTORY_LIMIT);

        self.storage.set(HISTORY_KEY, Value::Array(entries)).await?;

        let head_timestamp = self
            .read_raw()
            .await?
            .first()
            .and_then(|v| v.get("timestamp"))
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());
        if head_timestamp.as_deref() != Some(entry.timestamp.as_str()) {
            log::error!("history save verification failed for {}", entry.timestamp);
        }
        Ok(())
    }

    /// Full ordered sequence, most-recent-first. Entries that no longer
    /// parse are skipped.
    pub async fn get_all(&self) -> Result<Vec<HistoryEntry>> {
        let entries = self
            .read_raw()
            .await?
            .into_iter()
            .filter_map(|v| match serde_json::from_value::<HistoryEntry>(v) {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("skipping malformed history entry: {}", err);
                    None
                }
            })
            .collect();
        Ok(entries)
    }

    pub async fn clear(&self) -> Result<()> {
        self.storage.set(HISTORY_KEY, Value::Array(vec![])).await
    }

    /// Merges an externally supplied sequence ahead of the existing
    /// entries, keeping the cap. Returns how many imported entries were
    /// kept. A payload that is not an array of history entries is
    /// rejected without touching the store.
    pub async fn import(&self, payload: Value) -> Result<usize> {
        let incoming = match payload {
            Value::Array(entries) => entries,
            _ => bail!("history import payload must be an array"),
        };

        for value in &incoming {
            if let Err(err) = serde_json::from_value::<HistoryEntry>(value.clone()) {
                bail!("malformed history entry in import payload: {}", err);
            }
        }

        let existing = self.read_raw().await?;
        let added = incoming.len().min(HISTORY_LIMIT);

        let mut combined = incoming;
        combined.extend(existing);
        combined.truncate(HISTORY_LIMIT);

        self.storage
            .set(HISTORY_KEY, Value::Array(combined))
            .await?;
        Ok(added)
    }

    async fn read_raw(&self) -> Result<Vec<Value>> {
        match self.storage.get(HISTORY_KEY).await? {
            Some(Value::Array(entries)) => Ok(entries),
            Some(_) => {
                log::warn!("persisted history was not an array, resetting to empty");
                Ok(vec![])
            }
            None => Ok(vec![]),
        }
    }
}
