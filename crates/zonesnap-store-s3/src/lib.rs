// # S3 Blob Store
//
// Snapshot objects stored in an S3 (or S3-compatible) bucket.
//
// - Keys are used verbatim: `{timestamp}/zones.json`, `latest_backup_timestamp`, ...
// - Each put is a single PutObject, so objects are never partially visible
// - A missing key maps to `Error::NotFound`; every other failure to `Error::Storage`
//
// ## Custom Endpoints
//
// With an endpoint URL set (MinIO, LocalStack...) the client switches to
// path-style addressing, which those services expect.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;
use zonesnap_core::traits::BlobStore;
use zonesnap_core::{Error, StoreConfig};

/// S3-backed blob store
#[derive(Debug, Clone)]
pub struct S3BlobStore {
    client: Client,
    bucket: String,
}

impl S3BlobStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a store from a loaded AWS configuration
    ///
    /// `endpoint_url` overrides the S3 endpoint and enables path-style
    /// addressing.
    pub fn from_conf(
        sdk_config: &SdkConfig,
        bucket: impl Into<String>,
        endpoint_url: Option<&str>,
    ) -> Self {
        let mut builder = aws_sdk_s3::config::Builder::from(sdk_config);

        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self::new(Client::from_conf(builder.build()), bucket)
    }

    /// Build a store from an `s3` store configuration
    pub fn from_store_config(sdk_config: &SdkConfig, config: &StoreConfig) -> Result<Self, Error> {
        config.validate()?;

        match config {
            StoreConfig::S3 {
                bucket,
                endpoint_url,
            } => Ok(Self::from_conf(
                sdk_config,
                bucket.as_str(),
                endpoint_url.as_deref(),
            )),
            other => Err(Error::config(format!(
                "Store type '{}' is not an S3 store",
                other.type_name()
            ))),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<(), Error> {
        let size = body.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type(key))
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| {
                Error::storage(format!(
                    "Failed to write s3://{}/{}: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(e)
                ))
            })?;

        debug!("Wrote {} byte(s) to s3://{}/{}", size, self.bucket, key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, Error> {
        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let service_error = e.into_service_error();
                if service_error.is_no_such_key() {
                    return Err(Error::not_found(format!("s3://{}/{}", self.bucket, key)));
                }
                return Err(Error::storage(format!(
                    "Failed to read s3://{}/{}: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(service_error)
                )));
            }
        };

        let body = response
            .body
            .collect()
            .await
            .map_err(|e| {
                Error::storage(format!(
                    "Failed to read body of s3://{}/{}: {}",
                    self.bucket, key, e
                ))
            })?
            .into_bytes();

        Ok(body.to_vec())
    }

    fn store_name(&self) -> &'static str {
        "s3"
    }
}

fn content_type(key: &str) -> &'static str {
    if key.ends_with("json") {
        "application/json"
    } else {
        "text/plain"
    }
}
