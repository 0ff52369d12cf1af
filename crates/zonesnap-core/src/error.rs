//! Error types for zonesnap
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for zonesnap operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for zonesnap
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing destination, invalid store settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A listing operation misbehaved while following truncation cursors
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// Snapshot object missing from the blob store
    #[error("Not found: {0}")]
    NotFound(String),

    /// The provider reports that the requested resource does not exist
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// Any other remote-call failure reported by the DNS provider
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// Blob store failures other than a missing key
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a pagination error
    pub fn pagination(msg: impl Into<String>) -> Self {
        Self::Pagination(msg.into())
    }

    /// Create a "not found" error for a storage key
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a "resource not found" error for a provider-side resource
    pub fn resource_not_found(msg: impl Into<String>) -> Self {
        Self::ResourceNotFound(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this is a missing snapshot object
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Whether the provider reported the resource as nonexistent
    pub fn is_resource_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound(_))
    }
}
