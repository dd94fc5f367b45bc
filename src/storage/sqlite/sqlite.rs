#[cfg(test)]
#[path = "sqlite_test.rs"]
mod tests;

use async_trait::async_trait;
use eyre::{Context, Result};
use serde_json::Value;
use tokio_rusqlite::{Connection, OpenFlags, params, rusqlite};

use crate::storage::Storage;

use super::migration::MIGRATION;

pub struct Sqlite {
    conn: Connection,
}

impl Sqlite {
    pub async fn new(path: Option<&str>) -> Result<Self> {
        let conn = match path {
            Some(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
            )
            .await
            .wrap_err(format!("opening database path: {}", path))?,
            None => Connection::open_in_memory()
                .await
                .wrap_err("opening in-memory database")?,
        };

        let ret = Self { conn };
        ret.run_migration().await.wrap_err("running migration")?;
        Ok(ret)
    }

    async fn run_migration(&self) -> Result<()> {
        self.conn
            .call(|conn| Ok::<_, rusqlite::Error>(conn.execute_batch(MIGRATION)?))
            .await
            .wrap_err("executing migration")?;
        Ok(())
    }
}

#[async_trait]
impl Storage for Sqlite {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let owned_key = key.to_string();
        let raw = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare("SELECT value FROM documents WHERE key = ?")?;
                let mut rows = stmt.query(params![owned_key])?;
                let value = match rows.next()? {
                    Some(row) => Some(row.get::<_, String>(0)?),
                    None => None,
                };
                Ok::<_, rusqlite::Error>(value)
            })
            .await
            .wrap_err(format!("reading document {}", key))?;

        let raw = match raw {
            Some(raw) => raw,
            None => return Ok(None),
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                // Corrupted document. Recover locally instead of failing
                // every caller that touches this key.
                log::warn!("document {} holds invalid JSON: {}", key, err);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let owned_key = key.to_string();
        let raw = serde_json::to_string(&value).wrap_err("serializing document")?;
        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO documents (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                    params![owned_key, raw],
                )?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .wrap_err(format!("writing document {}", key))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let owned_key = key.to_string();
        self.conn
            .call(move |conn| {
                conn.execute("DELETE FROM documents WHERE key = ?", params![owned_key])?;
                Ok::<_, rusqlite::Error>(())
            })
            .await
            .wrap_err(format!("removing document {}", key))?;
        Ok(())
    }
}
