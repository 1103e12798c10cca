use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Blob store addressed by key inside a bucket fixed at construction.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Writes `body` under `key`, replacing any existing object.
    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Grants anonymous read access to `key`.
    async fn make_public(&self, key: &str) -> Result<()>;

    async fn presigned_get_url(&self, key: &str, expires_in: Duration) -> Result<String>;

    /// Permanent unsigned URL; only reachable after `make_public` succeeded.
    fn public_url(&self, key: &str) -> String;
}
