//! Object storage for generated artifacts (invoices)

mod s3;

use async_trait::async_trait;

use crate::invoice::InvoiceDocument;

pub use s3::S3Storage;

/// Object storage error
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("upload of {key} failed: {reason}")]
    Upload { key: String, reason: String },
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `document` under `key` and return its public URL
    async fn put(&self, key: &str, document: &InvoiceDocument) -> Result<String, StorageError>;
}
