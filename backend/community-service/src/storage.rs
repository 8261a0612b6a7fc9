/// Blob storage collaborator
///
/// The core hands bytes to `MediaStorage` and stores the returned public URL
/// on the content row; it never interprets the URL.
use crate::config::MediaConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn upload(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String>;
}

/// S3-backed media storage.
pub struct S3MediaStorage {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3MediaStorage {
    pub fn new(client: aws_sdk_s3::Client, config: &MediaConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl MediaStorage for S3MediaStorage {
    async fn upload(&self, key: &str, content_type: &str, bytes: Vec<u8>) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| AppError::Dependency(format!("media upload failed: {e}")))?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}
