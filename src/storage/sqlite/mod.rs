mod migration;
mod sqlite;

pub use sqlite::Sqlite;
