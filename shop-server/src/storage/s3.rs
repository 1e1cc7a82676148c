use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;

use super::{ObjectStorage, StorageError};
use crate::invoice::InvoiceDocument;

/// S3 bucket served through a public base URL (CloudFront or S3 website)
#[derive(Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    pub fn new(client: S3Client, bucket: impl Into<String>, public_base_url: &str) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{key}", self.public_base_url)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn put(&self, key: &str, document: &InvoiceDocument) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(document.body.clone()))
            .content_type(document.content_type)
            .content_disposition(format!("inline; filename=\"{}\"", document.file_name))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

        tracing::info!(bucket = %self.bucket, key = %key, "Invoice uploaded");
        Ok(self.public_url(key))
    }
}
