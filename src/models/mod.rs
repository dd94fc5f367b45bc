pub mod action;
pub mod event;
pub mod history;
pub mod settings;

pub use action::{Action, ActionKind, PageContext};
pub use event::{ArcEventTx, Event, EventTx};
pub use history::{ChatMessage, ChatRole, HistoryEntry};
pub use settings::{ProviderKind, Settings};
