//! Cache trait and error types

use crate::storage::CachedResponse;
use thiserror::Error;

/// Errors that can occur during cache operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cache operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Response cache keyed by request URL
pub trait ResponseCache {
    /// Looks up the cached body for `url`
    fn get(&self, url: &str) -> StorageResult<Option<CachedResponse>>;

    /// Stores (or replaces) the body fetched for `url`
    fn put(&mut self, url: &str, final_url: &str, body: &str) -> StorageResult<()>;

    /// Number of cached responses
    fn count(&self) -> StorageResult<u64>;

    /// Drops every cached response, returning how many were removed
    fn clear(&mut self) -> StorageResult<u64>;
}
