//! Store error types

use thiserror::Error;

/// Caller-facing error type for all store operations
#[derive(Debug, Error)]
pub enum StoreError {
    // ========== Configuration Errors ==========
    /// Invalid store configuration (partition count, unusable base path)
    #[error("configuration error: {0}")]
    Config(String),

    // ========== Routing Errors ==========
    /// Shard id outside the configured partition range
    #[error("shard id {shard} out of range for {count} shards")]
    InvalidShard { shard: usize, count: usize },

    /// Global index outside the last rebuilt logical length
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfRange { index: u64, len: u64 },

    /// No boundary entry owns an in-range index (stale or corrupt table)
    #[error("no shard owns index {index}: boundary table is stale")]
    IndexResolution { index: u64 },

    // ========== Codec Errors ==========
    /// Record could not be encoded or decoded
    #[error("codec error: {0}")]
    Codec(#[from] bincode::Error),

    // ========== Storage Errors ==========
    /// Underlying engine failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Engine-level errors raised by individual shards
#[derive(Debug, Error)]
pub enum StorageError {
    /// Shard database file could not be opened
    #[error("failed to open shard at {path}: {source}")]
    OpenFailed {
        path: String,
        source: rusqlite::Error,
    },

    /// No row with the requested rowid
    #[error("row {row} not found in shard {shard}")]
    RowNotFound { shard: usize, row: u64 },

    /// Operation issued after the shard was closed
    #[error("shard {0} is closed")]
    Closed(usize),

    /// SQLite database error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

// Engine errors reach callers through the storage layer

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Storage(StorageError::Sqlite(e))
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Storage(StorageError::Io(e))
    }
}
