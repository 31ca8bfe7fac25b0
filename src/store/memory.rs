use async_trait::async_trait;
use futures::stream::{self, BoxStream, StreamExt};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::Arc;
use tracing::debug;

use crate::error::StoreError;
use crate::store::{RecordStore, StoreResult};

/// In-process record store, ordered by key.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// First entry at or after `lower` that still carries `prefix`
    fn next_entry(&self, lower: Bound<String>, prefix: &str) -> Option<(String, Vec<u8>)> {
        let entries = self.entries.read();
        entries
            .range::<String, _>((lower, Bound::Unbounded))
            .next()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.entries
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        debug!("💾 put {} ({} bytes)", key, value.len());
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    fn iterate<'a>(&'a self, prefix: &'a str) -> BoxStream<'a, StoreResult<(String, Vec<u8>)>> {
        stream::unfold(Bound::Included(prefix.to_string()), move |lower| async move {
            self.next_entry(lower, prefix).map(|(key, value)| {
                (Ok::<_, StoreError>((key.clone(), value)), Bound::Excluded(key))
            })
        })
        .boxed()
    }
}
