// # File Blob Store
//
// BlobStore backed by a local directory tree.
//
// ## Layout
//
// Each key maps to a file under the root directory, with `/` separating
// directories:
//
// ```text
// <root>/latest_backup_timestamp
// <root>/2024-01-01T00:00:00Z/zones.json
// <root>/2024-01-01T00:00:00Z/example.com.json
// <root>/2024-01-01T00:00:00Z/health-checks.json
// ```
//
// ## Crash Behavior
//
// Writes go to a temporary sibling file which is then renamed over the
// target, so a reader never observes a half-written object.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::traits::BlobStore;
use crate::Error;

/// Directory-backed blob store with atomic object writes
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    root: PathBuf,
}

impl FileBlobStore {
    /// Open (and create if needed) a store rooted at `root`
    pub async fn new<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let root = root.as_ref().to_path_buf();

        fs::create_dir_all(&root).await.map_err(|e| {
            Error::config(format!(
                "Failed to create store directory {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to a path under the root
    ///
    /// Keys must be relative and must not climb out of the root.
    fn object_path(&self, key: &str) -> Result<PathBuf, Error> {
        let relative = Path::new(key);
        let well_formed = !key.is_empty()
            && relative
                .components()
                .all(|component| matches!(component, Component::Normal(_)));

        if !well_formed {
            return Err(Error::invalid_input(format!("Invalid object key: '{}'", key)));
        }

        Ok(self.root.join(relative))
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        path.with_file_name(name)
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), Error> {
        let path = self.object_path(key)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::storage(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        // Write to temporary file first
        let temp_path = Self::temp_path(&path);
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::storage(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(&body).await.map_err(|e| {
                Error::storage(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::storage(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        // Atomic rename (temp -> actual)
        fs::rename(&temp_path, &path).await.map_err(|e| {
            Error::storage(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                path.display(),
                e
            ))
        })?;

        tracing::trace!("Object written: {}", path.display());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        let path = self.object_path(key)?;

        match fs::read(&path).await {
            Ok(body) => Ok(body),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::not_found(key)),
            Err(e) => Err(Error::storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn store_name(&self) -> &'static str {
        "file"
    }
}
