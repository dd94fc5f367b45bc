#[cfg(test)]
#[path = "service_test.rs"]
mod tests;

use std::sync::Arc;

use eyre::Result;
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::models::Action;

use super::Dispatcher;

/// Owns the action queue. Every received action runs on its own task so a
/// slow provider call never blocks the queue.
pub struct DispatchService<'a> {
    dispatcher: Arc<Dispatcher>,
    action_rx: &'a mut mpsc::UnboundedReceiver<Action>,
    cancel_token: CancellationToken,
}

impl DispatchService<'_> {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        action_rx: &'_ mut mpsc::UnboundedReceiver<Action>,
        cancel_token: CancellationToken,
    ) -> DispatchService<'_> {
        DispatchService {
            dispatcher,
            action_rx,
            cancel_token,
        }
    }

    pub async fn start(&mut self) -> Result<()> {
        loop {
            tokio::select! {
                _ = self.cancel_token.cancelled() => {
                    log::debug!("Dispatch service cancelled");
                    return Ok(());
                }

                action = self.action_rx.recv() => {
                    if action.is_none() {
                        continue;
                    }
                    let action = action.unwrap();
                    let dispatcher = Arc::clone(&self.dispatcher);
                    tokio::spawn(async move {
                        handle_action(dispatcher, action).await;
                    });
                }
            }
        }
    }
}

async fn handle_action(dispatcher: Arc<Dispatcher>, action: Action) {
    match action {
        Action::Dispatch {
            action,
            selected_text,
            page,
            events,
        } => {
            dispatcher.dispatch(action, selected_text, page, events).await;
        }

        Action::SubmitQuestion {
            question,
            selected_text,
            page,
            events,
        } => {
            dispatcher
                .submit_question(question, selected_text, page, events)
                .await;
        }

        Action::Modify {
            action,
            prompt,
            page,
            events,
        } => {
            dispatcher.modify(action, prompt, page, events).await;
        }

        Action::Regenerate { page, events } => {
            dispatcher.regenerate(page, events).await;
        }

        Action::SidebarChat { prompt, page, reply } => {
            send_reply(reply, dispatcher.sidebar_chat(prompt, page).await);
        }

        Action::GetHistory { reply } => {
            let result = dispatcher.get_history().await.map_err(|e| e.to_string());
            send_reply(reply, result);
        }

        Action::ExportHistory { reply } => {
            let result = dispatcher.export_history().await.map_err(|e| e.to_string());
            send_reply(reply, result);
        }

        Action::ExportHistoryJson { reply } => {
            let result = dispatcher.get_history().await.map_err(|e| e.to_string());
            send_reply(reply, result);
        }

        Action::ClearHistory { reply } => {
            let result = dispatcher.clear_history().await.map_err(|e| e.to_string());
            send_reply(reply, result);
        }

        Action::ImportHistory { history, reply } => {
            let result = dispatcher
                .import_history(history)
                .await
                .map_err(|e| e.to_string());
            send_reply(reply, result);
        }

        Action::TestApi { reply } => {
            send_reply(reply, dispatcher.test_api().await);
        }

        Action::GetSettings { reply } => {
            let result = dispatcher.get_settings().await.map_err(|e| e.to_string());
            send_reply(reply, result);
        }

        Action::UpdateSettings { settings, reply } => {
            let result = dispatcher
                .update_settings(&settings)
                .await
                .map_err(|e| e.to_string());
            send_reply(reply, result);
        }
    }
}

fn send_reply<T>(reply: oneshot::Sender<Result<T, String>>, result: Result<T, String>) {
    if reply.send(result).is_err() {
        log::warn!("reply receiver dropped before the result was sent");
    }
}
