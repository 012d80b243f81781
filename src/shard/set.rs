//! Shard routing and broadcast

use std::fs;

use tracing::info;

use super::handle::Shard;
use super::ShardId;
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};

/// Owns every shard of a store and routes operations to them.
///
/// Shards are opened together at construction; failure on any shard aborts
/// the whole open with no partial set retained. No locking happens here: a
/// set assumes a single writer.
#[derive(Debug)]
pub struct ShardSet {
    shards: Vec<Shard>,
}

impl ShardSet {
    /// Open all shard databases described by the configuration
    pub fn open(config: &StoreConfig) -> StoreResult<Self> {
        let paths = config.shard_paths()?;
        for path in &paths {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        }

        let mut shards = Vec::with_capacity(paths.len());
        for (id, path) in paths.iter().enumerate() {
            shards.push(Shard::open(id, path, config)?);
        }
        info!(shards = shards.len(), "opened shard set");
        Ok(Self { shards })
    }

    /// Number of shards in the set
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }

    fn shard(&self, id: ShardId) -> StoreResult<&Shard> {
        self.shards.get(id).ok_or(StoreError::InvalidShard {
            shard: id,
            count: self.shards.len(),
        })
    }

    /// Append one blob to a shard
    pub fn append(&self, id: ShardId, blob: &[u8]) -> StoreResult<()> {
        self.shard(id)?.append(blob)
    }

    /// Append a batch of blobs to a shard
    pub fn append_batch(&self, id: ShardId, blobs: &[Vec<u8>]) -> StoreResult<()> {
        self.shard(id)?.append_batch(blobs)
    }

    /// Fetch the blob at a 1-based rowid of a shard
    pub fn fetch(&self, id: ShardId, row: u64) -> StoreResult<Vec<u8>> {
        self.shard(id)?.fetch(row)
    }

    /// Row count of a shard, 0 when empty
    pub fn row_count(&self, id: ShardId) -> StoreResult<u64> {
        self.shard(id)?.row_count()
    }

    /// Commit one shard's open transaction
    pub fn commit(&self, id: ShardId) -> StoreResult<()> {
        self.shard(id)?.commit()
    }

    /// Commit every shard
    pub fn commit_all(&self) -> StoreResult<()> {
        for shard in &self.shards {
            shard.commit()?;
        }
        Ok(())
    }

    /// Close one shard; later operations on it fail
    pub fn close(&mut self, id: ShardId) -> StoreResult<()> {
        let count = self.shards.len();
        self.shards
            .get_mut(id)
            .ok_or(StoreError::InvalidShard { shard: id, count })?
            .close()
    }

    /// Close every shard
    pub fn close_all(&mut self) -> StoreResult<()> {
        for shard in &mut self.shards {
            shard.close()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;

    fn open_set(partitions: usize) -> (tempfile::TempDir, ShardSet) {
        let dir = tempfile::tempdir().expect("tempdir");
        let set = ShardSet::open(&StoreConfig::new(dir.path(), partitions)).expect("open");
        (dir, set)
    }

    #[test]
    fn test_append_and_fetch() {
        let (_dir, set) = open_set(2);

        set.append(0, b"first").expect("append");
        set.append(0, b"second").expect("append");

        assert_eq!(set.fetch(0, 1).expect("fetch"), b"first");
        assert_eq!(set.fetch(0, 2).expect("fetch"), b"second");
        assert_eq!(set.row_count(0).expect("count"), 2);
        assert_eq!(set.row_count(1).expect("count"), 0);
    }

    #[test]
    fn test_fetch_missing_row() {
        let (_dir, set) = open_set(1);
        let err = set.fetch(0, 1).unwrap_err();
        assert!(matches!(
            err,
            StoreError::Storage(StorageError::RowNotFound { shard: 0, row: 1 })
        ));
    }

    #[test]
    fn test_invalid_shard_id() {
        let (_dir, set) = open_set(2);
        let err = set.append(2, b"x").unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidShard { shard: 2, count: 2 }
        ));
    }

    #[test]
    fn test_closed_shard_rejects_operations() {
        let (_dir, mut set) = open_set(2);
        set.close(1).expect("close");

        let err = set.append(1, b"x").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Storage(StorageError::Closed(1))
        ));

        // the other shard keeps working
        set.append(0, b"x").expect("append");
    }

    #[test]
    fn test_close_is_idempotent() {
        let (_dir, mut set) = open_set(1);
        set.close(0).expect("close");
        set.close(0).expect("close again");
    }
}
