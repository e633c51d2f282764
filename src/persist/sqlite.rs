//! SQLite-backed hit cache.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};
use serde::{Deserialize, Serialize};

use crate::record::Hit;

use super::{CacheError, CacheResult, HitCache};

const HITS_FORMAT_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct HitsEnvelope {
    format_version: u16,
    hits: Vec<Hit>,
}

/// SQLite implementation of [`crate::persist::HitCache`].
pub struct SqliteHitCache {
    conn: Connection,
}

impl SqliteHitCache {
    /// Opens or creates a cache database at `path`.
    ///
    /// Enables WAL mode and sets `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> CacheResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_connection(conn)
    }

    /// Opens an in-memory cache.
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_connection(conn)
    }

    fn init_connection(conn: Connection) -> CacheResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Drops entries stored before `cutoff_ms` (unix milliseconds).
    pub fn purge_older_than(&mut self, cutoff_ms: u64) -> CacheResult<usize> {
        let count = self
            .conn
            .execute("DELETE FROM hits WHERE ts_ms < ?1", params![cutoff_ms as i64])?;
        Ok(count)
    }
}

impl HitCache for SqliteHitCache {
    fn get(&mut self, call: &str) -> CacheResult<Option<Vec<Hit>>> {
        let payload: Option<Vec<u8>> = self
            .conn
            .query_row(
                "SELECT payload FROM hits WHERE call = ?1",
                params![call],
                |row| row.get(0),
            )
            .optional()?;
        let Some(payload) = payload else {
            return Ok(None);
        };
        let env: HitsEnvelope = serde_json::from_slice(&payload)?;
        if env.format_version != HITS_FORMAT_VERSION {
            return Err(CacheError::Message(format!(
                "unsupported hits format version: {}",
                env.format_version
            )));
        }
        Ok(Some(env.hits))
    }

    fn put(&mut self, call: &str, hits: &[Hit]) -> CacheResult<bool> {
        let env = HitsEnvelope {
            format_version: HITS_FORMAT_VERSION,
            hits: hits.to_vec(),
        };
        let payload = serde_json::to_vec(&env)?;
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO hits(call, ts_ms, payload) VALUES (?1, ?2, ?3)",
            params![call, now_ms() as i64, payload],
        )?;
        Ok(inserted == 1)
    }

    fn clear(&mut self) -> CacheResult<()> {
        self.conn.execute("DELETE FROM hits", [])?;
        Ok(())
    }

    fn len(&mut self) -> CacheResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM hits", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
