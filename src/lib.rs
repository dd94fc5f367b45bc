pub mod backend;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod history;
pub mod models;
pub mod settings;
pub mod stdio;
pub mod storage;
