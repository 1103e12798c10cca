use super::traits::ObjectStore;
use crate::{
    config::StorageConfig,
    error::{PosterError, Result},
};
use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::{
    error::ProvideErrorMetadata,
    presigning::PresigningConfig,
    primitives::ByteStream,
    types::ObjectCannedAcl,
    Client,
};
use std::time::Duration;

#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    config: StorageConfig,
}

impl S3ObjectStore {
    pub fn new(client: Client, config: StorageConfig) -> Self {
        Self { client, config }
    }

    pub fn from_sdk_config(sdk_config: &SdkConfig, config: StorageConfig) -> Self {
        Self::new(Client::new(sdk_config), config)
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }
}

fn sdk_error<E>(action: &str, err: aws_sdk_s3::error::SdkError<E>) -> PosterError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    match err.as_service_error() {
        Some(service_error) => PosterError::AwsServiceError(format!(
            "S3 {} failed: {} - {}",
            action,
            service_error.code().unwrap_or("unknown"),
            service_error.message().unwrap_or("no message")
        )),
        None => PosterError::StorageError(format!("S3 {} failed: {}", action, err)),
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        log::debug!(
            "Uploading {} bytes to s3://{}/{}",
            body.len(),
            self.config.bucket,
            key
        );

        self.client
            .put_object()
            .bucket(&self.config.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| match sdk_error("put_object", e) {
                PosterError::AwsServiceError(msg) => PosterError::StorageError(msg),
                other => other,
            })?;

        Ok(())
    }

    async fn make_public(&self, key: &str) -> Result<()> {
        self.client
            .put_object_acl()
            .bucket(&self.config.bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(|e| sdk_error("put_object_acl", e))?;

        Ok(())
    }

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> Result<String> {
        let presigning_config = PresigningConfig::builder()
            .expires_in(expires_in)
            .build()
            .map_err(|e| {
                PosterError::InternalError(format!("Failed to create presigning config: {}", e))
            })?;

        let presigned = self
            .client
            .get_object()
            .bucket(&self.config.bucket)
            .key(key)
            .presigned(presigning_config)
            .await
            .map_err(|e| PosterError::StorageError(format!("Failed to presign URL: {}", e)))?;

        Ok(presigned.uri().to_string())
    }

    fn public_url(&self, key: &str) -> String {
        self.config.object_url(key)
    }
}
