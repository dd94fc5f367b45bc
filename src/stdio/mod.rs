#[cfg(test)]
#[path = "stdio_test.rs"]
mod tests;

use std::sync::Arc;

use eyre::Result;
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::models::{Action, ActionKind, ArcEventTx, Event, PageContext, Settings};

/// One request line. Callers may pass an `id` to correlate the response
/// and event lines; without one a fresh uuid is assigned.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    id: Option<String>,
    #[serde(flatten)]
    request: Request,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum Request {
    #[serde(rename = "dispatchAction")]
    DispatchAction {
        action: ActionKind,
        #[serde(rename = "selectedText", default)]
        selected_text: String,
        #[serde(flatten)]
        page: PageContext,
    },
    #[serde(rename = "submitQuestion")]
    SubmitQuestion {
        question: String,
        #[serde(rename = "selectedText", default)]
        selected_text: String,
        #[serde(flatten)]
        page: PageContext,
    },
    #[serde(rename = "modifyResponse")]
    ModifyResponse {
        action: ActionKind,
        prompt: String,
        #[serde(flatten)]
        page: PageContext,
    },
    #[serde(rename = "regenerate")]
    Regenerate {
        #[serde(flatten)]
        page: PageContext,
    },
    #[serde(rename = "sidebarChat")]
    SidebarChat {
        prompt: String,
        #[serde(flatten)]
        page: PageContext,
    },
    #[serde(rename = "getHistory")]
    GetHistory,
    #[serde(rename = "exportHistory")]
    ExportHistory,
    #[serde(rename = "exportHistoryJson")]
    ExportHistoryJson,
    #[serde(rename = "clearHistory")]
    ClearHistory,
    #[serde(rename = "importHistory")]
    ImportHistory { history: Value },
    #[serde(rename = "testAPI")]
    TestApi,
    #[serde(rename = "getSettings")]
    GetSettings,
    #[serde(rename = "updateSettings")]
    UpdateSettings { settings: Settings },
}

/// Reads JSON requests from stdin, one per line, and writes response and
/// event lines to stdout. Returns once stdin closes or the token is
/// cancelled; EOF cancels the token so the rest of the process winds down.
pub async fn run(
    action_tx: mpsc::UnboundedSender<Action>,
    cancel_token: CancellationToken,
) -> Result<()> {
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(line) = out_rx.recv().await {
            if stdout.write_all(line.as_bytes()).await.is_err()
                || stdout.write_all(b"\n").await.is_err()
                || stdout.flush().await.is_err()
            {
                log::error!("stdout went away, stopping writer");
                break;
            }
        }
    });

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = cancel_token.cancelled() => {
                log::debug!("Stdio front cancelled");
                break;
            }

            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    handle_line(line, &action_tx, &out_tx);
                }
                Ok(None) => {
                    log::debug!("stdin closed, shutting down");
                    cancel_token.cancel();
                    break;
                }
                Err(err) => {
                    log::error!("failed to read stdin: {}", err);
                    cancel_token.cancel();
                    break;
                }
            }
        }
    }

    drop(out_tx);
    let _ = writer.await;
    Ok(())
}

fn handle_line(
    line: &str,
    action_tx: &mpsc::UnboundedSender<Action>,
    out_tx: &mpsc::UnboundedSender<String>,
) {
    let envelope: Envelope = match serde_json::from_str(line) {
        Ok(envelope) => envelope,
        Err(err) => {
            // Keep the error line correlatable when the payload carries a
            // usable id.
            let id = serde_json::from_str::<Value>(line)
                .ok()
                .and_then(|v| v.get("id").and_then(Value::as_str).map(String::from));
            let _ = out_tx.send(
                json!({"id": id, "success": false, "error": format!("malformed request: {}", err)})
                    .to_string(),
            );
            return;
        }
    };

    let id = envelope
        .id
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    match envelope.request {
        Request::DispatchAction {
            action,
            selected_text,
            page,
        } => {
            let events = event_forwarder(id, out_tx.clone());
            send_action(
                action_tx,
                Action::Dispatch {
                    action,
                    selected_text,
                    page,
                    events,
                },
            );
        }

        Request::SubmitQuestion {
            question,
            selected_text,
            page,
        } => {
            let events = event_forwarder(id, out_tx.clone());
            send_action(
                action_tx,
                Action::SubmitQuestion {
                    question,
                    selected_text,
                    page,
                    events,
                },
            );
        }

        Request::ModifyResponse {
            action,
            prompt,
            page,
        } => {
            let events = event_forwarder(id, out_tx.clone());
            send_action(
                action_tx,
                Action::Modify {
                    action,
                    prompt,
                    page,
                    events,
                },
            );
        }

        Request::Regenerate { page } => {
            let events = event_forwarder(id, out_tx.clone());
            send_action(action_tx, Action::Regenerate { page, events });
        }

        Request::SidebarChat { prompt, page } => {
            let (reply, rx) = oneshot::channel();
            send_action(action_tx, Action::SidebarChat { prompt, page, reply });
            relay_reply(id, out_tx.clone(), rx, |content| json!({"content": content}));
        }

        Request::GetHistory => {
            let (reply, rx) = oneshot::channel();
            send_action(action_tx, Action::GetHistory { reply });
            relay_reply(id, out_tx.clone(), rx, |history| json!({"history": history}));
        }

        Request::ExportHistory => {
            let (reply, rx) = oneshot::channel();
            send_action(action_tx, Action::ExportHistory { reply });
            relay_reply(id, out_tx.clone(), rx, |content| json!({"content": content}));
        }

        Request::ExportHistoryJson => {
            let (reply, rx) = oneshot::channel();
            send_action(action_tx, Action::ExportHistoryJson { reply });
            relay_reply(id, out_tx.clone(), rx, |history| json!({"history": history}));
        }

        Request::ClearHistory => {
            let (reply, rx) = oneshot::channel();
            send_action(action_tx, Action::ClearHistory { reply });
            relay_reply(id, out_tx.clone(), rx, |_: ()| json!({}));
        }

        Request::ImportHistory { history } => {
            let (reply, rx) = oneshot::channel();
            send_action(action_tx, Action::ImportHistory { history, reply });
            relay_reply(id, out_tx.clone(), rx, |added| json!({"addedCount": added}));
        }

        Request::TestApi => {
            let (reply, rx) = oneshot::channel();
            send_action(action_tx, Action::TestApi { reply });
            relay_reply(id, out_tx.clone(), rx, |message| json!({"message": message}));
        }

        Request::GetSettings => {
            let (reply, rx) = oneshot::channel();
            send_action(action_tx, Action::GetSettings { reply });
            relay_reply(id, out_tx.clone(), rx, |settings| {
                json!({"settings": settings})
            });
        }

        Request::UpdateSettings { settings } => {
            let (reply, rx) = oneshot::channel();
            send_action(action_tx, Action::UpdateSettings { settings, reply });
            relay_reply(id, out_tx.clone(), rx, |_: ()| json!({}));
        }
    }
}

fn send_action(action_tx: &mpsc::UnboundedSender<Action>, action: Action) {
    if action_tx.send(action).is_err() {
        log::error!("dispatch service is gone, dropping request");
    }
}

/// Bridges a per-request event channel onto the output stream.
fn event_forwarder(id: String, out_tx: mpsc::UnboundedSender<String>) -> ArcEventTx {
    let (tx, mut rx) = mpsc::unbounded_channel::<Event>();
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if out_tx.send(event_line(&id, &event)).is_err() {
                break;
            }
        }
    });
    Arc::new(tx)
}

fn event_line(id: &str, event: &Event) -> String {
    let value = match event {
        Event::Processing => json!({"id": id, "event": "processing"}),
        Event::QuestionInput { selected_text } => {
            json!({"id": id, "event": "questionInput", "selectedText": selected_text})
        }
        Event::Completed(content) => json!({"id": id, "event": "result", "content": content}),
        Event::Failed(message) => json!({"id": id, "event": "error", "error": message}),
    };
    value.to_string()
}

/// Awaits a oneshot reply on its own task and writes the response line.
fn relay_reply<T, F>(
    id: String,
    out_tx: mpsc::UnboundedSender<String>,
    rx: oneshot::Receiver<Result<T, String>>,
    render: F,
) where
    T: Send + 'static,
    F: FnOnce(T) -> Value + Send + 'static,
{
    tokio::spawn(async move {
        let line = match rx.await {
            Ok(Ok(value)) => {
                let mut body = json!({"id": id, "success": true});
                if let (Value::Object(fields), Value::Object(extra)) = (&mut body, render(value)) {
                    fields.extend(extra);
                }
                body.to_string()
            }
            Ok(Err(message)) => {
                json!({"id": id, "success": false, "error": message}).to_string()
            }
            Err(_) => json!({
                "id": id,
                "success": false,
                "error": "request was dropped before completion"
            })
            .to_string(),
        };
        let _ = out_tx.send(line);
    });
}
