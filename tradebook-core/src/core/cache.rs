//! Local key/value cache used as the fallback persistence tier.

use crate::{Result, TradebookError};
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

/// Key under which the JSON snapshot of the whole entry collection is stored.
pub const SNAPSHOT_KEY: &str = "journalEntries";

/// A string key/value store. Writes overwrite whatever was stored under the key.
pub trait LocalCache: Send {
    /// Returns the stored value, or `None` if nothing was ever written under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`TradebookError::LocalCacheUnavailable`] if the store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`TradebookError::LocalCacheUnavailable`] if the store cannot be written.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

fn unavailable(e: rusqlite::Error) -> TradebookError {
    TradebookError::LocalCacheUnavailable(e.to_string())
}

/// SQLite-backed cache holding a single `cache` table.
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Opens (creating if needed) the cache database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TradebookError::Io`] if the parent directory cannot be created, or
    /// [`TradebookError::Database`] if the file is not a usable SQLite database.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Opens a throwaway in-memory database.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
        )?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl LocalCache for SqliteCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row("SELECT value FROM cache WHERE key = ?", [key], |row| {
                row.get::<_, String>(0)
            })
            .optional()
            .map_err(unavailable)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO cache (key, value) VALUES (?, ?)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                [key, value],
            )
            .map_err(unavailable)?;
        Ok(())
    }
}

/// Process-local cache; contents are lost when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    values: HashMap<String, String>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
