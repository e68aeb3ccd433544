//! S3-compatible storage provider.
//!
//! Works against AWS S3 or any S3-compatible endpoint (the production
//! deployment points this at the managed storage service holding detection
//! photos). Credentials and region resolve through the standard AWS
//! environment/profile chain.

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use crate::{join_url, validate_key, StorageError, StorageProvider, StoredObject};

/// Blob store backed by an S3 bucket.
pub struct S3Storage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3Storage {
    /// Connect using the ambient AWS configuration.
    ///
    /// `public_base_url` is the URL prefix dashboards fetch objects from
    /// (a CDN or the bucket's public endpoint); defaults to the bucket's
    /// virtual-hosted S3 URL when not configured.
    pub async fn connect(bucket: impl Into<String>, public_base_url: Option<String>) -> Self {
        let config = aws_config::load_from_env().await;
        let client = aws_sdk_s3::Client::new(&config);
        let bucket = bucket.into();

        let public_base_url = public_base_url.unwrap_or_else(|| {
            let region = config
                .region()
                .map(|r| r.as_ref().to_string())
                .unwrap_or_else(|| "us-east-1".to_string());
            format!("https://{bucket}.s3.{region}.amazonaws.com")
        });

        Self {
            client,
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl StorageProvider for S3Storage {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        validate_key(key)?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes.to_vec()))
            .send()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        tracing::debug!(key, bucket = %self.bucket, size = bytes.len(), "Stored blob in S3");
        Ok(join_url(&self.public_base_url, key))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<StoredObject>, StorageError> {
        let mut objects = Vec::new();
        let mut continuation: Option<String> = None;

        loop {
            let response = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(continuation.take())
                .send()
                .await
                .map_err(|e| StorageError::Backend(e.to_string()))?;

            for object in response.contents() {
                if let Some(name) = object.key() {
                    objects.push(StoredObject {
                        name: name.to_string(),
                        url: join_url(&self.public_base_url, name),
                    });
                }
            }

            match response.next_continuation_token() {
                Some(token) => continuation = Some(token.to_string()),
                None => break,
            }
        }

        Ok(objects)
    }
}
