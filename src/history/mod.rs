pub mod chat;
pub mod export;
pub mod store;

pub use chat::ChatLog;
pub use store::HistoryStore;
