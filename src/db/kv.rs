use rusqlite::{params, Connection, OptionalExtension};

use crate::error::PersistenceError;

pub type Result<T> = std::result::Result<T, PersistenceError>;

/// Flat key-value persistence. Values are opaque strings; integer helpers sit
/// on top so callers do not have to agree on an encoding for scalars.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Read an integer. Values that do not parse are treated as absent.
    fn get_int(&self, key: &str) -> Result<Option<i64>> {
        Ok(self.get(key)?.and_then(|raw| raw.trim().parse().ok()))
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<()> {
        self.set(key, &value.to_string())
    }
}

/// Production store backed by the `kv_store` table.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wrap a connection whose schema has already been ensured.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}
