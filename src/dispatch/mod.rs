#[cfg(test)]
#[path = "dispatch_test.rs"]
mod tests;

pub mod error;
pub mod prompts;
pub mod service;

pub use error::humanize;
pub use service::DispatchService;

use std::time::Duration;

use eyre::Result;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::backend::{BackendFactory, ProviderFactory};
use crate::config::constants::{RELAY_RETRY_DELAY_MS, TEST_PROMPT};
use crate::history::{ChatLog, HistoryStore, export};
use crate::models::{
    ActionKind, ArcEventTx, ChatMessage, ChatRole, Event, HistoryEntry, PageContext, Settings,
};
use crate::settings::SettingsStore;
use crate::storage::ArcStorage;

/// The most recent templated dispatch, replayed on regenerate.
/// Modifications and questions do not overwrite it.
#[derive(Clone)]
struct LastAction {
    action: ActionKind,
    selected_text: String,
}

/// Routes every action through the same pipeline: resolve the prompt, call
/// the active provider, persist the exchange and relay status events back
/// to the requesting surface.
pub struct Dispatcher {
    history: HistoryStore,
    chat_log: ChatLog,
    settings: SettingsStore,
    factory: Box<dyn BackendFactory>,
    last_action: Mutex<Option<LastAction>>,
}

impl Dispatcher {
    pub fn new(storage: ArcStorage) -> Self {
        Self::with_factory(storage, Box::new(ProviderFactory))
    }

    pub fn with_factory(storage: ArcStorage, factory: Box<dyn BackendFactory>) -> Self {
        Self {
            history: HistoryStore::new(storage.clone()),
            chat_log: ChatLog::new(storage.clone()),
            settings: SettingsStore::new(storage),
            factory,
            last_action: Mutex::new(None),
        }
    }

    /// Entry point for selection actions. Ask-question only relays the
    /// selection back so the surface can collect the question; everything
    /// else runs a full exchange.
    pub async fn dispatch(
        &self,
        action: ActionKind,
        selected_text: String,
        page: PageContext,
        events: ArcEventTx,
    ) {
        if action == ActionKind::AskQuestion {
            self.relay(&events, Event::QuestionInput { selected_text })
                .await;
            return;
        }

        if !action.is_templated() {
            self.relay(
                &events,
                Event::Failed(format!("Unknown action: {}", action)),
            )
            .await;
            return;
        }

        let settings = match self.settings.load().await {
            Ok(settings) => settings,
            Err(err) => {
                self.relay(&events, Event::Failed(humanize(&err.to_string())))
                    .await;
                return;
            }
        };

        *self.last_action.lock().await = Some(LastAction {
            action,
            selected_text: selected_text.clone(),
        });

        // is_templated guarantees a template exists.
        let template = prompts::resolve_template(action, &settings).unwrap_or_default();
        let prompt = prompts::render(&template, &selected_text);
        self.run_exchange(&settings, action, selected_text, prompt, &page, &events, false)
            .await;
    }

    /// Second phase of ask-question: the surface collected the question
    /// and sends it back along with the original selection.
    pub async fn submit_question(
        &self,
        question: String,
        selected_text: String,
        page: PageContext,
        events: ArcEventTx,
    ) {
        let settings = match self.settings.load().await {
            Ok(settings) => settings,
            Err(err) => {
                self.relay(&events, Event::Failed(humanize(&err.to_string())))
                    .await;
                return;
            }
        };

        let prompt = prompts::question_prompt(&selected_text, &question);
        let input_text = prompts::question_input_text(&selected_text, &question);
        self.run_exchange(
            &settings,
            ActionKind::AskQuestion,
            input_text,
            prompt,
            &page,
            &events,
            false,
        )
        .await;
    }

    /// Reworks a previous response with a caller-built prompt. The prompt
    /// doubles as the recorded input text and the entry is marked as a
    /// modification.
    pub async fn modify(
        &self,
        action: ActionKind,
        prompt: String,
        page: PageContext,
        events: ArcEventTx,
    ) {
        if !matches!(action, ActionKind::Shorter | ActionKind::Longer) {
            self.relay(
                &events,
                Event::Failed(format!("Unknown modification: {}", action)),
            )
            .await;
            return;
        }

        let settings = match self.settings.load().await {
            Ok(settings) => settings,
            Err(err) => {
                self.relay(&events, Event::Failed(humanize(&err.to_string())))
                    .await;
                return;
            }
        };

        self.run_exchange(
            &settings,
            action,
            prompt.clone(),
            prompt,
            &page,
            &events,
            true,
        )
        .await;
    }

    /// Replays the last templated dispatch against the current settings.
    /// Without a recorded action this does nothing.
    pub async fn regenerate(&self, page: PageContext, events: ArcEventTx) {
        let last = self.last_action.lock().await.clone();
        match last {
            Some(last) => {
                self.dispatch(last.action, last.selected_text, page, events)
                    .await;
            }
            None => log::warn!("regenerate requested with no previous action"),
        }
    }

    /// Sidebar chat turn. Returns the answer directly instead of streaming
    /// events, and records the turn in both the response history and the
    /// chat transcript.
    pub async fn sidebar_chat(
        &self,
        prompt: String,
        page: PageContext,
    ) -> Result<String, String> {
        let settings = self
            .settings
            .load()
            .await
            .map_err(|err| humanize(&err.to_string()))?;
        let response = self.query(&settings, &prompt).await?;

        let entry = HistoryEntry::new(ActionKind::SidebarChat, &prompt, &prompt, &response)
            .with_provider(settings.provider.to_string())
            .with_model(settings.model_or_default())
            .with_page(&page);
        if let Err(err) = self.history.append(entry).await {
            log::error!("failed to record sidebar chat in history: {}", err);
        }

        if let Err(err) = self
            .chat_log
            .append(ChatMessage::new(ChatRole::User, &prompt))
            .await
        {
            log::error!("failed to record chat message: {}", err);
        }
        if let Err(err) = self
            .chat_log
            .append(ChatMessage::new(ChatRole::Assistant, &response))
            .await
        {
            log::error!("failed to record chat message: {}", err);
        }

        Ok(response)
    }

    /// Fires a canned prompt at the configured provider. Nothing is
    /// persisted.
    pub async fn test_api(&self) -> Result<String, String> {
        let settings = self
            .settings
            .load()
            .await
            .map_err(|err| humanize(&err.to_string()))?;
        self.query(&settings, TEST_PROMPT).await
    }

    pub async fn get_history(&self) -> Result<Vec<HistoryEntry>> {
        self.history.get_all().await
    }

    pub async fn export_history(&self) -> Result<String> {
        let entries = self.history.get_all().await?;
        Ok(export::format_as_text(&entries))
    }

    pub async fn clear_history(&self) -> Result<()> {
        self.history.clear().await
    }

    pub async fn import_history(&self, payload: Value) -> Result<usize> {
        self.history.import(payload).await
    }

    pub async fn get_settings(&self) -> Result<Settings> {
        self.settings.load().await
    }

    pub async fn update_settings(&self, settings: &Settings) -> Result<()> {
        self.settings.save(settings).await
    }

    async fn run_exchange(
        &self,
        settings: &Settings,
        action: ActionKind,
        input_text: String,
        prompt: String,
        page: &PageContext,
        events: &ArcEventTx,
        is_modification: bool,
    ) {
        self.relay(events, Event::Processing).await;

        match self.query(settings, &prompt).await {
            Ok(response) => {
                let mut entry = HistoryEntry::new(action, input_text, &prompt, &response)
                    .with_provider(settings.provider.to_string())
                    .with_model(settings.model_or_default())
                    .with_page(page);
                if is_modification {
                    entry = entry.as_modification();
                }
                // A failed save must not turn a good answer into an error.
                if let Err(err) = self.history.append(entry).await {
                    log::error!("failed to record exchange in history: {}", err);
                }
                self.relay(events, Event::Completed(response)).await;
            }
            Err(message) => {
                self.relay(events, Event::Failed(message)).await;
            }
        }
    }

    async fn query(&self, settings: &Settings, prompt: &str) -> Result<String, String> {
        let backend = self
            .factory
            .create(settings)
            .map_err(|err| humanize(&err.to_string()))?;
        log::debug!("dispatching prompt to {}", backend.name());
        backend
            .complete(prompt)
            .await
            .map_err(|err| humanize(&err.to_string()))
    }

    /// Event channels are best-effort: one retry after a short delay, then
    /// the event is dropped with a log line.
    async fn relay(&self, events: &ArcEventTx, event: Event) {
        if events.send(event.clone()).await.is_ok() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(RELAY_RETRY_DELAY_MS)).await;
        if events.send(event).await.is_err() {
            log::error!("event receiver went away, dropping event");
        }
    }
}
