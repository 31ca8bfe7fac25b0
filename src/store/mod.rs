// Key-value persistence for cashout bookkeeping
pub mod keys;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::StoreError;

pub use memory::MemoryStore;
pub use postgres::PgRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value record store.
///
/// Implementations must be safe for concurrent get/put on a single key.
/// No cross-key transactions are offered.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fails with `StoreError::NotFound` when the key is absent
    async fn get(&self, key: &str) -> StoreResult<Vec<u8>>;

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Lazily yields every `(key, value)` whose key starts with `prefix`, in key order.
    ///
    /// Dropping the stream stops the scan; calling again restarts it.
    fn iterate<'a>(&'a self, prefix: &'a str) -> BoxStream<'a, StoreResult<(String, Vec<u8>)>>;
}

/// Load and decode a JSON record
pub async fn get_json<T: DeserializeOwned>(store: &dyn RecordStore, key: &str) -> StoreResult<T> {
    let raw = store.get(key).await?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Like [`get_json`], mapping an absent key to `None`
pub async fn find_json<T: DeserializeOwned>(
    store: &dyn RecordStore,
    key: &str,
) -> StoreResult<Option<T>> {
    match get_json(store, key).await {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Encode and store a JSON record, overwriting any previous value
pub async fn put_json<T: Serialize + Sync + ?Sized>(
    store: &dyn RecordStore,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let raw = serde_json::to_vec(value)?;
    store.put(key, raw).await
}
