use std::sync::Arc;

use serde_json::json;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::models::{ActionKind, Event, PageContext, Settings};
use crate::storage::{ArcStorage, sqlite::Sqlite};

use super::*;

struct Harness {
    action_tx: mpsc::UnboundedSender<Action>,
    cancel_token: CancellationToken,
    handle: JoinHandle<eyre::Result<()>>,
}

async fn start_service() -> Harness {
    let storage: ArcStorage = Arc::new(Sqlite::new(None).await.unwrap());
    let dispatcher = Arc::new(Dispatcher::new(storage));
    let (action_tx, mut action_rx) = mpsc::unbounded_channel();
    let cancel_token = CancellationToken::new();
    let token = cancel_token.clone();

    let handle = tokio::spawn(async move {
        let mut service = DispatchService::new(dispatcher, &mut action_rx, token);
        service.start().await
    });

    Harness {
        action_tx,
        cancel_token,
        handle,
    }
}

#[tokio::test]
async fn test_settings_roundtrip_over_the_queue() {
    let harness = start_service().await;

    let settings = Settings {
        api_key: Some("key".to_string()),
        model: Some("gpt-4o".to_string()),
        ..Settings::default()
    };
    let (reply, rx) = oneshot::channel();
    harness
        .action_tx
        .send(Action::UpdateSettings {
            settings: settings.clone(),
            reply,
        })
        .unwrap();
    rx.await.unwrap().unwrap();

    let (reply, rx) = oneshot::channel();
    harness.action_tx.send(Action::GetSettings { reply }).unwrap();
    assert_eq!(rx.await.unwrap().unwrap(), settings);

    harness.cancel_token.cancel();
    harness.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_history_operations_over_the_queue() {
    let harness = start_service().await;

    let payload = json!([{
        "timestamp": "2026-01-05T10:00:00Z",
        "action": "summarize",
        "inputText": "text",
        "prompt": "Summarize: text",
        "response": "short",
        "provider": "openai",
        "model": "gpt-4o-mini"
    }]);
    let (reply, rx) = oneshot::channel();
    harness
        .action_tx
        .send(Action::ImportHistory {
            history: payload,
            reply,
        })
        .unwrap();
    assert_eq!(rx.await.unwrap().unwrap(), 1);

    let (reply, rx) = oneshot::channel();
    harness.action_tx.send(Action::GetHistory { reply }).unwrap();
    let history = rx.await.unwrap().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].action, ActionKind::Summarize);

    let (reply, rx) = oneshot::channel();
    harness
        .action_tx
        .send(Action::ExportHistory { reply })
        .unwrap();
    let report = rx.await.unwrap().unwrap();
    assert!(report.contains("Total Entries: 1"));

    let (reply, rx) = oneshot::channel();
    harness.action_tx.send(Action::ClearHistory { reply }).unwrap();
    rx.await.unwrap().unwrap();

    let (reply, rx) = oneshot::channel();
    harness
        .action_tx
        .send(Action::ExportHistory { reply })
        .unwrap();
    assert_eq!(rx.await.unwrap().unwrap(), "No history available.");

    harness.cancel_token.cancel();
    harness.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_import_rejection_is_reported_over_the_queue() {
    let harness = start_service().await;

    let (reply, rx) = oneshot::channel();
    harness
        .action_tx
        .send(Action::ImportHistory {
            history: json!({"not": "an array"}),
            reply,
        })
        .unwrap();
    let err = rx.await.unwrap().unwrap_err();
    assert!(err.contains("must be an array"));

    harness.cancel_token.cancel();
    harness.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_dispatch_without_key_streams_failure_events() {
    let harness = start_service().await;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    harness
        .action_tx
        .send(Action::Dispatch {
            action: ActionKind::Summarize,
            selected_text: "text".to_string(),
            page: PageContext::default(),
            events: Arc::new(event_tx),
        })
        .unwrap();

    assert_eq!(event_rx.recv().await, Some(Event::Processing));
    assert_eq!(
        event_rx.recv().await,
        Some(Event::Failed(
            "Invalid API key. Please check your settings.".to_string()
        ))
    );

    harness.cancel_token.cancel();
    harness.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_cancel_stops_the_service() {
    let harness = start_service().await;
    harness.cancel_token.cancel();
    harness.handle.await.unwrap().unwrap();
}
