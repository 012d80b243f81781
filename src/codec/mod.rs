//! Record serialization seam
//!
//! The store treats records as opaque blobs. The pair turning records into
//! bytes and back is injected, so callers can substitute their own format
//! for the default bincode one.

mod bincode;

pub use self::bincode::BincodeCodec;

use crate::error::StoreResult;

/// Encode/decode pair for the record type stored in the log
pub trait Codec<T> {
    /// Serialize a record into an opaque blob
    fn encode(&self, record: &T) -> StoreResult<Vec<u8>>;

    /// Deserialize a blob produced by [`encode`](Self::encode)
    fn decode(&self, bytes: &[u8]) -> StoreResult<T>;
}
