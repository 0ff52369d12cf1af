//! Blob store implementations
//!
//! This module provides the built-in BlobStore implementations:
//! - [`MemoryBlobStore`]: In-memory (testing)
//! - [`FileBlobStore`]: Local directory with atomic writes

pub mod file;
pub mod memory;

pub use file::FileBlobStore;
pub use memory::MemoryBlobStore;
