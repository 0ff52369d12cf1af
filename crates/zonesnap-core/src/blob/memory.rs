// # Memory Blob Store
//
// In-memory implementation of BlobStore.
//
// Nothing survives the process. Useful for tests and for dry experiments
// with the backup/restore flow.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::traits::BlobStore;
use crate::Error;

/// In-memory blob store
///
/// Cloning shares the underlying map, so a test can keep a handle and
/// inspect what a component wrote.
///
/// # Example
///
/// ```rust,no_run
/// use zonesnap_core::blob::MemoryBlobStore;
/// use zonesnap_core::traits::BlobStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = MemoryBlobStore::new();
///     store.put("latest_backup_timestamp", b"2024-01-01T00:00:00Z".to_vec()).await?;
///     assert_eq!(store.get("latest_backup_timestamp").await?, b"2024-01-01T00:00:00Z");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    inner: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of objects in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// All keys, sorted
    pub async fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.read().await.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Remove an object (test helper for simulating partial snapshots)
    pub async fn remove(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.write().await.remove(key)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), Error> {
        self.inner.write().await.insert(key.to_string(), body);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        self.inner
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| Error::not_found(key))
    }

    fn store_name(&self) -> &'static str {
        "memory"
    }
}
