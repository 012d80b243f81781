use serde::de::DeserializeOwned;
use serde::Serialize;

use super::Codec;
use crate::error::StoreResult;

/// Default codec: bincode over serde.
///
/// Round-trips any serde-representable record, including nested composite
/// types.
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl<T> Codec<T> for BincodeCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, record: &T) -> StoreResult<Vec<u8>> {
        Ok(bincode::serialize(record)?)
    }

    fn decode(&self, bytes: &[u8]) -> StoreResult<T> {
        Ok(bincode::deserialize(bytes)?)
    }
}
