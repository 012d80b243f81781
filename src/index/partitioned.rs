//! The partitioned index: one logical sequence over N shards

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use super::boundary::{BoundaryEntry, BoundaryTable};
use super::RowAddr;
use crate::codec::{BincodeCodec, Codec};
use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::shard::{ShardId, ShardSet};

/// Per-shard fill statistics from a fresh rescan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Row count per shard, in shard-id order
    pub shard_rows: Vec<u64>,

    /// Sum of all shard row counts
    pub total_rows: u64,
}

/// Ordered object store addressed by a global zero-based index, striped
/// across independent SQLite shards.
///
/// The logical sequence is the shard-major concatenation of every shard's
/// rows. The boundary table and cached length are derived state, rebuilt by
/// [`len`](Self::len) (and at open) and never on writes, so reads of freshly
/// written rows require an intervening `len()` call.
///
/// Writes without an explicit shard rotate round-robin. Writes to an
/// explicit shard also move the rotation cursor there, biasing the next
/// default write toward the shard just touched.
///
/// One instance expects a single writer; nothing here locks.
pub struct PartitionedIndex<T, C = BincodeCodec>
where
    C: Codec<T>,
{
    shards: ShardSet,
    boundaries: BoundaryTable,
    total_len: u64,
    cursor: ShardId,
    codec: C,
    _record: PhantomData<fn() -> T>,
}

impl<T> PartitionedIndex<T, BincodeCodec>
where
    T: Serialize + DeserializeOwned,
{
    /// Open a store with the default bincode codec
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        Self::with_codec(config, BincodeCodec)
    }
}

impl<T, C> PartitionedIndex<T, C>
where
    C: Codec<T>,
{
    /// Open a store with a custom codec
    pub fn with_codec(config: StoreConfig, codec: C) -> StoreResult<Self> {
        let shards = ShardSet::open(&config)?;
        let mut index = Self {
            shards,
            boundaries: BoundaryTable::default(),
            total_len: 0,
            cursor: 0,
            codec,
            _record: PhantomData,
        };
        index.rebuild_boundaries()?;
        info!(
            shards = index.shards.shard_count(),
            len = index.total_len,
            "opened partitioned index"
        );
        Ok(index)
    }

    /// Rescan every shard and rebuild the boundary table, cached length and
    /// rotation cursor.
    ///
    /// Zero-row shards contribute no boundary entry and are not candidates
    /// for the cursor seed. The cursor lands on the least-filled non-empty
    /// shard (first occurrence wins on ties) so rotation resumes where the
    /// set is thinnest; when every shard is empty the cursor is left as is.
    pub fn rebuild_boundaries(&mut self) -> StoreResult<()> {
        self.boundaries.clear();
        self.total_len = 0;

        let mut offset = 0u64;
        let mut min_rows: Option<u64> = None;
        for id in 0..self.shards.shard_count() {
            let rows = self.shards.row_count(id)?;
            if rows == 0 {
                continue;
            }
            self.total_len += rows;
            if min_rows.map_or(true, |m| rows < m) {
                min_rows = Some(rows);
                self.cursor = id;
            }
            self.boundaries.push(BoundaryEntry {
                start: offset,
                end: offset + rows - 1,
            });
            offset += rows;
        }
        debug!(len = self.total_len, cursor = self.cursor, "rebuilt boundaries");
        Ok(())
    }

    /// Authoritative logical length; always a full O(shards) rescan
    pub fn len(&mut self) -> StoreResult<u64> {
        self.rebuild_boundaries()?;
        Ok(self.total_len)
    }

    /// Whether the store holds no rows (rescans)
    pub fn is_empty(&mut self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Resolve a global index against the last rebuilt boundaries.
    ///
    /// Single-shard stores bypass the boundary table entirely. With more
    /// shards the owning entry is found by binary search; the shard id is
    /// the entry position, which counts non-empty shards only.
    pub fn resolve(&self, index: u64) -> StoreResult<RowAddr> {
        if index >= self.total_len {
            return Err(StoreError::IndexOutOfRange {
                index,
                len: self.total_len,
            });
        }
        if self.shards.shard_count() == 1 {
            return Ok(RowAddr {
                shard: 0,
                row: index + 1,
            });
        }

        let (slot, entry) = self
            .boundaries
            .locate(index)
            .ok_or(StoreError::IndexResolution { index })?;
        Ok(RowAddr {
            shard: slot,
            row: index - entry.start + 1,
        })
    }

    /// Read the record at a global index.
    ///
    /// Bounds are checked against the last rebuilt length; call
    /// [`len`](Self::len) after writing for new rows to become visible.
    pub fn get(&self, index: u64) -> StoreResult<T> {
        let addr = self.resolve(index)?;
        let blob = self.shards.fetch(addr.shard, addr.row)?;
        self.codec.decode(&blob)
    }

    /// Append a record to the shard under the rotation cursor, then advance
    /// the cursor
    pub fn put(&mut self, record: &T) -> StoreResult<()> {
        let blob = self.codec.encode(record)?;
        self.shards.append(self.cursor, &blob)?;
        self.advance_cursor();
        Ok(())
    }

    /// Append a record to an explicit shard; the rotation cursor moves there
    pub fn put_to(&mut self, shard: ShardId, record: &T) -> StoreResult<()> {
        let blob = self.codec.encode(record)?;
        self.shards.append(shard, &blob)?;
        self.cursor = shard;
        Ok(())
    }

    /// Batch [`put`](Self::put): the whole batch lands on one shard and the
    /// cursor advances once, even for an empty batch
    pub fn put_many(&mut self, records: &[T]) -> StoreResult<()> {
        let blobs = self.encode_all(records)?;
        self.shards.append_batch(self.cursor, &blobs)?;
        self.advance_cursor();
        Ok(())
    }

    /// Batch [`put_to`](Self::put_to)
    pub fn put_many_to(&mut self, shard: ShardId, records: &[T]) -> StoreResult<()> {
        let blobs = self.encode_all(records)?;
        self.shards.append_batch(shard, &blobs)?;
        self.cursor = shard;
        Ok(())
    }

    /// Commit every shard's open transaction
    pub fn commit(&self) -> StoreResult<()> {
        self.shards.commit_all()
    }

    /// Commit a single shard
    pub fn commit_shard(&self, shard: ShardId) -> StoreResult<()> {
        self.shards.commit(shard)
    }

    /// Close a single shard; operations touching it afterwards fail
    pub fn close_shard(&mut self, shard: ShardId) -> StoreResult<()> {
        self.shards.close(shard)
    }

    /// Close every shard, consuming the store
    pub fn close(mut self) -> StoreResult<()> {
        self.shards.close_all()
    }

    /// Per-shard fill statistics; rescans row counts without touching the
    /// boundary table
    pub fn stats(&self) -> StoreResult<StoreStats> {
        let mut shard_rows = Vec::with_capacity(self.shards.shard_count());
        for id in 0..self.shards.shard_count() {
            shard_rows.push(self.shards.row_count(id)?);
        }
        let total_rows = shard_rows.iter().sum();
        Ok(StoreStats {
            shard_rows,
            total_rows,
        })
    }

    /// Boundary table from the last rebuild
    pub fn boundaries(&self) -> &BoundaryTable {
        &self.boundaries
    }

    /// Shard that receives the next rotation-mode write
    pub fn write_cursor(&self) -> ShardId {
        self.cursor
    }

    /// Number of shards, fixed at open
    pub fn shard_count(&self) -> usize {
        self.shards.shard_count()
    }

    fn encode_all(&self, records: &[T]) -> StoreResult<Vec<Vec<u8>>> {
        records.iter().map(|r| self.codec.encode(r)).collect()
    }

    fn advance_cursor(&mut self) {
        self.cursor = (self.cursor + 1) % self.shards.shard_count();
    }
}
