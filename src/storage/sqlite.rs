//! SQLite implementation of the response cache

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ResponseCache, StorageResult};
use crate::storage::{url_hash, CachedResponse};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// SQLite-backed response cache
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Opens or creates the cache database at `path`
    pub fn new(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

impl ResponseCache for SqliteCache {
    fn get(&self, url: &str) -> StorageResult<Option<CachedResponse>> {
        let response = self
            .conn
            .query_row(
                "SELECT url, final_url, body, fetched_at FROM responses WHERE url_hash = ?1",
                params![url_hash(url)],
                |row| {
                    Ok(CachedResponse {
                        url: row.get(0)?,
                        final_url: row.get(1)?,
                        body: row.get(2)?,
                        fetched_at: row.get(3)?,
                    })
                },
            )
            .optional()?;

        Ok(response)
    }

    fn put(&mut self, url: &str, final_url: &str, body: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT OR REPLACE INTO responses (url_hash, url, final_url, body, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![url_hash(url), url, final_url, body, now],
        )?;
        Ok(())
    }

    fn count(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn clear(&mut self) -> StorageResult<u64> {
        let removed = self.conn.execute("DELETE FROM responses", [])?;
        Ok(removed as u64)
    }
}
