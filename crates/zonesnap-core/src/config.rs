//! Configuration types for zonesnap
//!
//! The binary fills these from environment variables; library users can
//! construct or deserialize them directly.

use serde::{Deserialize, Serialize};

/// Where snapshots are stored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreConfig {
    /// S3 (or S3-compatible) bucket
    S3 {
        /// Destination bucket name
        bucket: String,
        /// Custom endpoint (MinIO, LocalStack...); implies path-style addressing
        #[serde(default)]
        endpoint_url: Option<String>,
    },

    /// Local directory
    File {
        /// Root directory of the store
        path: String,
    },
}

impl StoreConfig {
    /// Validate the store configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            StoreConfig::S3 { bucket, endpoint_url } => {
                if bucket.is_empty() {
                    return Err(crate::Error::config(
                        "S3 bucket name must be set (S3_BUCKET_NAME)",
                    ));
                }
                if let Some(url) = endpoint_url
                    && !url.starts_with("https://")
                    && !url.starts_with("http://")
                {
                    return Err(crate::Error::config(format!(
                        "S3 endpoint must use HTTP or HTTPS scheme. Got: {}",
                        url
                    )));
                }
                Ok(())
            }
            StoreConfig::File { path } => {
                if path.is_empty() {
                    return Err(crate::Error::config("File store path cannot be empty"));
                }
                Ok(())
            }
        }
    }

    /// Get the store type name
    pub fn type_name(&self) -> &str {
        match self {
            StoreConfig::S3 { .. } => "s3",
            StoreConfig::File { .. } => "file",
        }
    }
}

/// DNS provider configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Region used to build API clients; SDK default chain when absent
    #[serde(default)]
    pub region: Option<String>,
}
