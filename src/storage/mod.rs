//! Storage module for the on-disk HTTP response cache
//!
//! Page bodies are kept in SQLite keyed by the SHA-256 of their URL, so a
//! re-run only hits the network for pages it has never fetched
//! successfully.

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteCache;
pub use traits::{ResponseCache, StorageError, StorageResult};

use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Cache handle shared by worker tasks
pub type SharedCache = Arc<Mutex<SqliteCache>>;

/// A cached page body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedResponse {
    pub url: String,
    /// URL the body was served from after redirects
    pub final_url: String,
    pub body: String,
    pub fetched_at: String,
}

/// Opens (or creates) the cache database at `path`
pub fn open_cache(path: &Path) -> StorageResult<SharedCache> {
    Ok(Arc::new(Mutex::new(SqliteCache::new(path)?)))
}

/// Hex-encoded SHA-256 of a URL, the cache key
pub fn url_hash(url: &str) -> String {
    hex::encode(Sha256::digest(url.as_bytes()))
}
