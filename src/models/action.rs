#[cfg(test)]
#[path = "action_test.rs"]
mod tests;

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::oneshot;

use crate::models::{ArcEventTx, HistoryEntry, Settings};

/// Symbolic request types. The serialized names double as the `action`
/// field of persisted history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum ActionKind {
    #[serde(rename = "summarize")]
    Summarize,
    #[serde(rename = "generateReply")]
    GenerateReply,
    #[serde(rename = "generateComment")]
    GenerateComment,
    #[serde(rename = "factCheck")]
    FactCheck,
    #[serde(rename = "askQuestion")]
    AskQuestion,
    #[serde(rename = "shorter")]
    Shorter,
    #[serde(rename = "longer")]
    Longer,
    #[serde(rename = "regenerate")]
    Regenerate,
    #[serde(rename = "sidebar_chat")]
    SidebarChat,
    #[serde(other, rename = "unknown")]
    Unknown,
}

impl ActionKind {
    pub fn is_templated(&self) -> bool {
        matches!(
            self,
            ActionKind::Summarize
                | ActionKind::GenerateReply
                | ActionKind::GenerateComment
                | ActionKind::FactCheck
        )
    }

    /// Friendly name used in the history export.
    pub fn display_name(&self) -> &'static str {
        match self {
            ActionKind::Summarize => "Summarize",
            ActionKind::GenerateReply => "Generate Reply",
            ActionKind::GenerateComment => "Generate Comment",
            ActionKind::FactCheck => "Fact Check",
            ActionKind::AskQuestion => "Asked Question",
            ActionKind::Shorter => "Make Shorter",
            ActionKind::Longer => "Make Longer",
            ActionKind::Regenerate => "Regenerate",
            ActionKind::SidebarChat => "Sidebar Chat",
            ActionKind::Unknown => "Unknown",
        }
    }
}

impl Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Where the selection came from. Recorded verbatim in history entries.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PageContext {
    #[serde(default, rename = "pageUrl")]
    pub url: Option<String>,
    #[serde(default, rename = "pageTitle")]
    pub title: Option<String>,
}

type Reply<T> = oneshot::Sender<Result<T, String>>;

/// Messages handled by the dispatch service. Status-stream variants carry
/// a per-request event channel; request/response variants carry a oneshot
/// reply sender.
pub enum Action {
    Dispatch {
        action: ActionKind,
        selected_text: String,
        page: PageContext,
        events: ArcEventTx,
    },
    SubmitQuestion {
        question: String,
        selected_text: String,
        page: PageContext,
        events: ArcEventTx,
    },
    Modify {
        action: ActionKind,
        prompt: String,
        page: PageContext,
        events: ArcEventTx,
    },
    Regenerate {
        page: PageContext,
        events: ArcEventTx,
    },
    SidebarChat {
        prompt: String,
        page: PageContext,
        reply: Reply<String>,
    },
    GetHistory {
        reply: Reply<Vec<HistoryEntry>>,
    },
    ExportHistory {
        reply: Reply<String>,
    },
    ExportHistoryJson {
        reply: Reply<Vec<HistoryEntry>>,
    },
    ClearHistory {
        reply: Reply<()>,
    },
    ImportHistory {
        history: Value,
        reply: Reply<usize>,
    },
    TestApi {
        reply: Reply<String>,
    },
    GetSettings {
        reply: Reply<Settings>,
    },
    UpdateSettings {
        settings: Settings,
        reply: Reply<()>,
    },
}
