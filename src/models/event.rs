use std::sync::Arc;

use tokio::sync::mpsc;

/// Status transitions relayed back to the surface that requested an
/// action. A dispatch always ends with either `Completed` or `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Processing,
    QuestionInput { selected_text: String },
    Completed(String),
    Failed(String),
}

#[async_trait::async_trait]
pub trait EventTx {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>>;
}

#[async_trait::async_trait]
impl EventTx for mpsc::Sender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event).await
    }
}

#[async_trait::async_trait]
impl EventTx for mpsc::UnboundedSender<Event> {
    async fn send(&self, event: Event) -> Result<(), mpsc::error::SendError<Event>> {
        self.send(event)
    }
}

pub type ArcEventTx = Arc<dyn EventTx + Send + Sync>;
