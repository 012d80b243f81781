//! Shared fixtures for integration tests

use shardlog::{PartitionedIndex, StoreConfig};
use tempfile::TempDir;

/// Open a string store over `partitions` shards in a fresh temp directory.
///
/// The returned `TempDir` must outlive the store.
pub fn open_store(partitions: usize) -> (TempDir, PartitionedIndex<String>) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = PartitionedIndex::open(StoreConfig::new(dir.path(), partitions))
        .expect("failed to open store");
    (dir, store)
}

/// Reopen a store over the same directory
pub fn reopen_store(dir: &TempDir, partitions: usize) -> PartitionedIndex<String> {
    PartitionedIndex::open(StoreConfig::new(dir.path(), partitions))
        .expect("failed to reopen store")
}

pub fn record(i: usize) -> String {
    format!("record-{i}")
}
