//! Optional `call -> hits` memo, in memory or on SQLite.

/// In-memory cache.
pub mod memory;
/// SQLite-backed cache.
pub mod sqlite;

use std::fmt;

use crate::record::Hit;

pub use memory::MemoryHitCache;
pub use sqlite::SqliteHitCache;

/// Cache storage failure.
#[derive(Debug)]
pub enum CacheError {
    /// SQLite error.
    Sqlite(rusqlite::Error),
    /// Payload (de)serialization error.
    Serde(serde_json::Error),
    /// Anything else, e.g. an unknown payload version.
    Message(String),
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::Serde(err) => write!(f, "payload: {err}"),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for CacheError {}

impl From<rusqlite::Error> for CacheError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<serde_json::Error> for CacheError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serde(value)
    }
}

/// Result alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Memo of lookup results keyed by normalized call.
///
/// Entries are never evicted; `put` keeps the first value stored for a call.
pub trait HitCache: Send {
    /// Cached hits for `call`.
    fn get(&mut self, call: &str) -> CacheResult<Option<Vec<Hit>>>;
    /// Stores `hits` unless `call` is already present. Returns true if stored.
    fn put(&mut self, call: &str, hits: &[Hit]) -> CacheResult<bool>;
    /// Removes every entry.
    fn clear(&mut self) -> CacheResult<()>;
    /// Number of cached calls.
    fn len(&mut self) -> CacheResult<usize>;
}
