//! Partitioned, append-mostly object store over independent SQLite shards.
//!
//! Records are serialized through an injected [`Codec`] and appended to one
//! of N shard databases, either explicitly or by round-robin rotation.
//! Reads address the logical concatenation of all shards through a global
//! zero-based index, resolved to a (shard, rowid) pair by binary search
//! over a rebuilt-on-demand boundary table.
//!
//! ```no_run
//! use shardlog::{PartitionedIndex, StoreConfig};
//!
//! # fn main() -> shardlog::StoreResult<()> {
//! let mut store = PartitionedIndex::<String>::open(StoreConfig::new("./data", 4))?;
//! store.put(&"hello".to_string())?;
//! store.commit()?;
//! let len = store.len()?;
//! let record = store.get(len - 1)?;
//! # Ok(())
//! # }
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod index;
pub mod shard;

// Re-exports
pub use codec::{BincodeCodec, Codec};
pub use config::StoreConfig;
pub use error::{StorageError, StoreError, StoreResult};
pub use index::{BoundaryEntry, BoundaryTable, PartitionedIndex, RowAddr, StoreStats};
pub use shard::{ShardId, ShardSet};
