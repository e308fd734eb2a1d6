use crate::util::{DbError, from_rfc3339, to_rfc3339};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, params};

/// Keys of the local key-value layout.
pub const PICKUP_REQUESTS_KEY: &str = "pickup_requests";
pub const USER_KEY: &str = "user";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvEntry {
    pub value: String,
    pub updated_at: DateTime<Utc>,
}

pub struct KvTable<'a> {
    conn: &'a Connection,
}

impl<'a> KvTable<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        Ok(self.entry(key)?.map(|entry| entry.value))
    }

    pub fn entry(&self, key: &str) -> Result<Option<KvEntry>, DbError> {
        let row = self
            .conn
            .query_row(
                "SELECT value, updated_at FROM kv WHERE key = ?1",
                [key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)),
            )
            .optional()?;
        let Some((value, updated_at)) = row else {
            return Ok(None);
        };
        Ok(Some(KvEntry {
            value,
            updated_at: from_rfc3339(&updated_at)?,
        }))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), DbError> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, to_rfc3339(&Utc::now())],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<bool, DbError> {
        let removed = self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(removed > 0)
    }
}
