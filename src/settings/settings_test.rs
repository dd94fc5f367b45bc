use serde_json::json;
use std::sync::Arc;

use crate::storage::{ArcStorage, Storage, sqlite::Sqlite};

use super::*;

async fn setup_store() -> (SettingsStore, ArcStorage) {
    let storage: ArcStorage = Arc::new(Sqlite::new(None).await.unwrap());
    (SettingsStore::new(Arc::clone(&storage)), storage)
}

#[tokio::test]
async fn test_load_defaults() {
    let (store, _) = setup_store().await;

    let settings = store.load().await.unwrap();
    assert_eq!(settings.provider, ProviderKind::OpenAI);
    assert_eq!(settings.api_key, None);
    assert_eq!(settings.model, None);
    assert_eq!(settings.model_or_default(), "gpt-4o-mini");
}

#[tokio::test]
async fn test_save_and_load() {
    let (store, _) = setup_store().await;

    let settings = Settings {
        provider: ProviderKind::Google,
        api_key: Some("secret".to_string()),
        model: Some("gemini-2.0-flash-exp".to_string()),
        prompt_summarize: Some("Summarize: {selectedText}".to_string()),
        prompt_reply: None,
        prompt_comment: None,
    };

    store.save(&settings).await.unwrap();
    let loaded = store.load().await.unwrap();
    assert_eq!(loaded, settings);
}

#[tokio::test]
async fn test_save_removes_cleared_values() {
    let (store, storage) = setup_store().await;

    let mut settings = Settings {
        api_key: Some("secret".to_string()),
        ..Settings::default()
    };
    store.save(&settings).await.unwrap();

    settings.api_key = None;
    store.save(&settings).await.unwrap();

    assert_eq!(storage.get("apiKey").await.unwrap(), None);
}

#[tokio::test]
async fn test_load_unknown_provider_falls_back() {
    let (store, storage) = setup_store().await;

    storage.set("provider", json!("fancy-llm")).await.unwrap();

    let settings = store.load().await.unwrap();
    assert_eq!(settings.provider, ProviderKind::OpenAI);
}
