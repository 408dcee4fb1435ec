//! Storage error types

use thiserror::Error;

/// Storage specific error
#[derive(Debug, Error)]
pub enum StorageError {
    /// Listing request failed
    #[error("list request for '{prefix}' in bucket '{bucket}' failed: {message}")]
    Request {
        bucket: String,
        prefix: String,
        message: String,
    },

    /// Bucket does not exist
    #[error("bucket not found: {bucket}")]
    BucketNotFound { bucket: String },
}

impl StorageError {
    /// Create request error
    pub fn request(
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Request {
            bucket: bucket.into(),
            prefix: prefix.into(),
            message: message.into(),
        }
    }
}

/// Result alias
pub type Result<T> = std::result::Result<T, StorageError>;
