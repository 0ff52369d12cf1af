// # Blob Store Trait
//
// Durable key/value storage for snapshot objects.
//
// ## Implementations
//
// - In-memory: `MemoryBlobStore` (tests)
// - Local directory: `FileBlobStore`
// - S3: `zonesnap-store-s3` crate

use async_trait::async_trait;

/// Trait for blob store implementations
///
/// Keys are `/`-separated paths such as `2024-01-01T00:00:00Z/zones.json`.
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write (or overwrite) the object at `key`
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), crate::Error>;

    /// Read the object at `key`
    ///
    /// # Returns
    ///
    /// - `Ok(bytes)`: the object body
    /// - `Err(Error::NotFound)`: no object at `key`
    /// - `Err(_)`: storage failure
    async fn get(&self, key: &str) -> Result<Vec<u8>, crate::Error>;

    /// Name of the backend, for logging
    fn store_name(&self) -> &'static str;
}
