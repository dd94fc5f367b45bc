pub mod sqlite;

use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use serde_json::Value;
use sqlite::Sqlite;

use crate::config::StorageConfig;

/// Async key/value document store. Values are JSON documents; the
/// history, transcript and settings stores are thin typed wrappers on
/// top of this.
#[async_trait]
pub trait Storage {
    async fn get(&self, key: &str) -> Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

pub type ArcStorage = Arc<dyn Storage + Send + Sync>;

pub async fn new_storage(config: &StorageConfig) -> Result<ArcStorage> {
    let storage = match config {
        StorageConfig::Sqlite(sqlite_config) => {
            Arc::new(Sqlite::new(sqlite_config.path.as_deref()).await?)
        }
    };
    Ok(storage)
}
